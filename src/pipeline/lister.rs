//! Stage 1: Listing
//!
//! Pages through a user's gists and emits them one by one, in page order.
//! The first page is always requested. Paging continues while the source
//! announces a next page that does not exceed the last known page count
//! (when no page count has been announced yet, only the next page matters).
//!
//! A failed page is emitted once on the error channel and ends the listing;
//! gists from earlier pages have already been handed downstream and are kept.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use log::{debug, info};

use crate::error::Error;
use crate::github::{Gist, GistSource};

/// Starts the listing thread for `user`.
///
/// Returns the gist stream and the error stream. Both close when listing
/// stops, whether it ran out of pages or hit an error.
pub fn list_gists(source: Arc<dyn GistSource>, user: &str) -> (Receiver<Gist>, Receiver<Error>) {
    let (gist_tx, gist_rx) = mpsc::sync_channel(0);
    let (err_tx, err_rx) = mpsc::channel();
    let user = user.to_string();

    thread::spawn(move || {
        let mut page = 1;
        // 0 until the source announces a page count
        let mut last_page = 0;
        let mut listed = 0usize;

        loop {
            let result = match source.list_page(&user, page) {
                Ok(result) => result,
                Err(e) => {
                    let _ = err_tx.send(e);
                    break;
                }
            };
            debug!(
                "page {} of {}: {} gists (next {})",
                page,
                result.last_page,
                result.gists.len(),
                result.next_page
            );

            if result.last_page != 0 {
                last_page = result.last_page;
            }

            for gist in result.gists {
                if gist_tx.send(gist).is_err() {
                    return;
                }
                listed += 1;
            }

            // A next page that does not move forward would repeat forever
            let next = result.next_page;
            if next == 0 || next <= page || (last_page != 0 && next > last_page) {
                break;
            }
            page = next;
        }

        info!("Listed {} gists of {}", listed, user);
    });

    (gist_rx, err_rx)
}
