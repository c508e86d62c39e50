//! Error fan-in
//!
//! Merges any number of error streams into one. Each input gets a forwarding
//! thread holding a clone of the output sender; the output closes once every
//! forwarder has drained its input and dropped that sender. Errors keep their
//! order within a stream, with no ordering across streams.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::error::Error;

pub fn merge_errors(streams: Vec<Receiver<Error>>) -> Receiver<Error> {
    let (out_tx, out_rx) = mpsc::channel();

    for stream in streams {
        let out_tx = out_tx.clone();
        thread::spawn(move || {
            for err in stream {
                if out_tx.send(err).is_err() {
                    break;
                }
            }
        });
    }

    out_rx
}
