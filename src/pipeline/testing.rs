//! Test doubles for the pipeline stages.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::git::GitExecutor;
use crate::github::{Gist, GistPage, GistSource};

pub fn gist(id: &str) -> Gist {
    Gist {
        id: id.to_string(),
        git_pull_url: format!("https://gist.github.com/{}.git", id),
        description: None,
        html_url: None,
    }
}

pub fn page(gists: Vec<Gist>, next_page: u32, last_page: u32) -> GistPage {
    GistPage {
        gists,
        next_page,
        last_page,
    }
}

/// Serves a fixed list of pages; `None` entries fail with an API error
pub struct MockSource {
    pages: Vec<Option<GistPage>>,
    requested: Mutex<Vec<u32>>,
}

impl MockSource {
    pub fn new(pages: Vec<Option<GistPage>>) -> Self {
        Self {
            pages,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl GistSource for MockSource {
    fn list_page(&self, user: &str, page: u32) -> Result<GistPage> {
        self.requested.lock().unwrap().push(page);

        match self.pages.get(page as usize - 1) {
            Some(Some(p)) => Ok(p.clone()),
            _ => Err(Error::Api {
                url: format!("https://api.github.com/users/{}/gists?page={}", user, page),
                status: 500,
                message: "Server Error".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    pub dir: Option<PathBuf>,
    pub args: Vec<String>,
}

type CallRule = Box<dyn Fn(&[&str]) -> bool + Send + Sync>;

/// Records every git invocation and fails the ones matching a rule.
///
/// Successful invocations print nothing unless a reply rule matches. Also
/// tracks how many invocations are in flight at once.
pub struct MockGit {
    calls: Mutex<Vec<GitCall>>,
    fail: Option<CallRule>,
    replies: Vec<(CallRule, String)>,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockGit {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: None,
            replies: Vec::new(),
            delay: Duration::ZERO,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn fail_when(mut self, rule: impl Fn(&[&str]) -> bool + Send + Sync + 'static) -> Self {
        self.fail = Some(Box::new(rule));
        self
    }

    pub fn reply_when(
        mut self,
        rule: impl Fn(&[&str]) -> bool + Send + Sync + 'static,
        output: &str,
    ) -> Self {
        self.replies.push((Box::new(rule), output.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<GitCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.args.join(" ").starts_with(prefix))
            .collect()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl GitExecutor for MockGit {
    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().unwrap().push(GitCall {
            dir: dir.map(Path::to_path_buf),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        match &self.fail {
            Some(rule) if rule(args) => Err(Error::GitCommand {
                command: args.join(" "),
                output: "fatal: simulated failure".to_string(),
            }),
            _ => Ok(self
                .replies
                .iter()
                .find(|(rule, _)| rule(args))
                .map(|(_, output)| output.clone())
                .unwrap_or_default()),
        }
    }
}
