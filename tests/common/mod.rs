//! Shared test fixtures for the airline-demand integration tests.
//!
//! `setup_sample_app()` writes small OpenFlights-format `routes.dat` and
//! `airports.dat` files into a temp directory and builds an offline instance
//! reading them. `serve_once()` answers a single HTTP request with a canned
//! response, standing in for the live flight API.

#![allow(dead_code)]

use airline_demand::{AirlineDemand, AirlineDemandBuilder};
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;

/// Route counts: LHR-JFK 3, SYD-MEL 3, JFK-LHR 2, CDG-LHR 1, MEL-SYD 1.
/// The last row has no source code and is dropped by the catalog.
pub const SAMPLE_ROUTES: &str = "\
BA,1355,LHR,507,JFK,3797,,0,744 777
AA,24,LHR,507,JFK,3797,Y,0,777
VS,5347,LHR,507,JFK,3797,,0,744
BA,1355,JFK,3797,LHR,507,,0,744
AA,24,JFK,3797,LHR,507,,0,777
QF,4178,SYD,3361,MEL,3339,,0,738
VA,5351,SYD,3361,MEL,3339,,0,738
JQ,2978,SYD,3361,MEL,3339,,0,320
QF,4178,MEL,3339,SYD,3361,,0,738
AF,137,CDG,1382,LHR,507,,0,320
ZZ,\\N,\\N,\\N,MEL,3339,,0,738
";

pub const SAMPLE_AIRPORTS: &str = "\
507,\"London Heathrow Airport\",\"London\",\"United Kingdom\",\"LHR\",\"EGLL\",51.4706,-0.461941,83,0,\"E\",\"Europe/London\",\"airport\",\"OurAirports\"
3797,\"John F Kennedy International Airport\",\"New York\",\"United States\",\"JFK\",\"KJFK\",40.63980103,-73.77890015,13,-5,\"A\",\"America/New_York\",\"airport\",\"OurAirports\"
3361,\"Sydney Kingsford Smith International Airport\",\"Sydney\",\"Australia\",\"SYD\",\"YSSY\",-33.94609833,151.177002,21,10,\"O\",\"Australia/Sydney\",\"airport\",\"OurAirports\"
3339,\"Melbourne International Airport\",\"Melbourne\",\"Australia\",\"MEL\",\"YMML\",-37.673302,144.843002,434,10,\"O\",\"Australia/Melbourne\",\"airport\",\"OurAirports\"
1382,\"Charles de Gaulle International Airport\",\"Paris\",\"France\",\"CDG\",\"LFPG\",49.012798,2.55,392,1,\"E\",\"Europe/Paris\",\"airport\",\"OurAirports\"
9999,\"Nowhere Strip\",\"Nowhere\",\"Atlantis\",\\N,\\N,0,0,0,0,\"U\",\\N,\"airport\",\"OurAirports\"
";

pub const ROUTES_HEADER: &str =
    "Airline,AirlineID,SourceIATA,SourceAirportID,DestIATA,DestAirportID,Codeshare,Stops,Equipment\n";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Offline builder reading the given routes/airports contents.
pub fn sample_builder(
    tmp: &tempfile::TempDir,
    routes: &str,
    airports: &str,
) -> AirlineDemandBuilder {
    let routes_path = write_file(tmp.path(), "routes.dat", routes);
    let airports_path = write_file(tmp.path(), "airports.dat", airports);
    AirlineDemand::builder()
        .cache_dir(tmp.path().join("cache"))
        .offline(true)
        .routes_file(routes_path)
        .airports_file(airports_path)
}

/// An offline instance over the sample dataset, without an API key.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_sample_app() -> (AirlineDemand, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let app = sample_builder(&tmp, SAMPLE_ROUTES, SAMPLE_AIRPORTS)
        .build()
        .unwrap();
    (app, tmp)
}

/// Answer exactly one HTTP request with `status_line` and a JSON `body`.
///
/// Returns the URL to point the flight client at.
pub fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request head before answering
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}/v1/flights", addr)
}
