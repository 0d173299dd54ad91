// src/opener.rs
use log::{info, warn};
use url::Url;

/// Fire-and-forget hand-off to the system browser. Failures are cosmetic
/// and never reach the playback logic.
pub trait UrlOpener: Send {
    fn open(&self, url: &str);
}

pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) {
        if Url::parse(url).is_err() {
            warn!("SystemOpener: refusing to open malformed URL {:?}", url);
            return;
        }

        #[cfg(target_os = "macos")]
        let cmd = "open";
        #[cfg(not(target_os = "macos"))]
        let cmd = "xdg-open";

        info!("SystemOpener: opening {}", url);
        match std::process::Command::new(cmd)
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
        {
            Ok(mut child) => {
                // Reap the child in a background thread to avoid zombie processes.
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => {
                warn!("SystemOpener: failed to open browser: {}", e);
            }
        }
    }
}

/// Records opened URLs instead of spawning anything.
#[derive(Default)]
pub struct FakeOpener {
    pub opened: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl UrlOpener for FakeOpener {
    fn open(&self, url: &str) {
        self.opened.lock().expect("opened log poisoned").push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_opener_records_urls() {
        let opener = FakeOpener::default();
        let log = opener.opened.clone();
        opener.open("https://www.npr.org/sections/money/");
        assert_eq!(*log.lock().unwrap(), vec!["https://www.npr.org/sections/money/".to_string()]);
    }
}
