//! In-process mock Tyrant server shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tyrantkv::protocol::{read_request, write_status, write_value, Magic, STATUS_OK};
use tyrantkv::{Config, Session};

/// Status the mock sends for any failure
pub const STATUS_FAIL: i8 = 1;

type Store = Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>;

/// A server that keeps everything in a map and answers like Tokyo Tyrant
pub struct MockServer {
    addr: SocketAddr,
    store: Store,

    /// When set, requests are read and dropped without a reply
    stall: Arc<AtomicBool>,
}

impl MockServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let store: Store = Arc::new(Mutex::new(HashMap::new()));
        let stall = Arc::new(AtomicBool::new(false));

        let (accept_store, accept_stall) = (Arc::clone(&store), Arc::clone(&stall));
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { return };
                let store = Arc::clone(&accept_store);
                let stall = Arc::clone(&accept_stall);
                thread::spawn(move || serve(stream, store, stall));
            }
        });

        Self { addr, store, stall }
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn config(&self) -> Config {
        Config::builder()
            .addr(self.addr())
            .timeout(Duration::from_secs(2))
            .build()
    }

    pub fn session(&self) -> Session {
        Session::connect(self.config()).unwrap()
    }

    pub fn set_stall(&self, stall: bool) {
        self.stall.store(stall, Ordering::SeqCst);
    }

    pub fn value(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &[u8], value: &[u8]) {
        self.store.lock().insert(key.to_vec(), value.to_vec());
    }
}

fn serve(stream: TcpStream, store: Store, stall: Arc<AtomicBool>) {
    let Ok(read_half) = stream.try_clone() else { return };
    let mut reader = BufReader::new(read_half);
    let mut writer = stream;

    loop {
        let Ok(req) = read_request(&mut reader) else { return };
        if stall.load(Ordering::SeqCst) {
            continue;
        }

        let blobs: Vec<&[u8]> = req.blobs().collect();
        let result = match req.magic() {
            Magic::Put => {
                store.lock().insert(blobs[0].to_vec(), blobs[1].to_vec());
                write_status(&mut writer, STATUS_OK)
            }
            Magic::PutKeep => {
                let mut map = store.lock();
                if map.contains_key(blobs[0]) {
                    write_status(&mut writer, STATUS_FAIL)
                } else {
                    map.insert(blobs[0].to_vec(), blobs[1].to_vec());
                    write_status(&mut writer, STATUS_OK)
                }
            }
            Magic::PutNr => {
                store.lock().insert(blobs[0].to_vec(), blobs[1].to_vec());
                Ok(())
            }
            Magic::Out => match store.lock().remove(blobs[0]) {
                Some(_) => write_status(&mut writer, STATUS_OK),
                None => write_status(&mut writer, STATUS_FAIL),
            },
            Magic::Get => {
                let value = store.lock().get(blobs[0]).cloned();
                match value {
                    Some(value) => write_status(&mut writer, STATUS_OK)
                        .and_then(|_| write_value(&mut writer, &value)),
                    None => write_status(&mut writer, STATUS_FAIL),
                }
            }
        };

        if result.is_err() {
            return;
        }
    }
}
