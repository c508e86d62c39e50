//! Stage 2: Clone URL extraction

use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::github::Gist;

/// Maps every gist to its clone URL on a dedicated thread.
///
/// The output closes once `gists` is exhausted.
pub fn clone_urls(gists: Receiver<Gist>) -> Receiver<String> {
    let (url_tx, url_rx) = mpsc::sync_channel(0);

    thread::spawn(move || {
        for gist in gists {
            if url_tx.send(gist.git_pull_url).is_err() {
                break;
            }
        }
    });

    url_rx
}
