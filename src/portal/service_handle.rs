use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Running listener tasks plus the shutdown flag they watch.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handles: Vec<(&'static str, JoinHandle<Result<()>>)>,
}

impl ServiceHandle {
    /// New handle together with a receiver for tasks to clone.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { shutdown_tx: tx, join_handles: vec![] }, rx)
    }

    /// Track a spawned task under `name` so shutdown waits for it.
    pub fn attach(&mut self, name: &'static str, h: JoinHandle<Result<()>>) {
        self.join_handles.push((name, h));
    }

    /// Signal shutdown and wait for every task. Task failures are logged, and
    /// the first one is returned after all tasks have finished.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);

        let mut first_err = None;
        for (name, h) in self.join_handles {
            let outcome = match h.await {
                Ok(res) => res,
                Err(e) => Err(anyhow::Error::new(e)),
            };
            if let Err(e) = outcome {
                tracing::error!("{} task failed: {:?}", name, e);
                first_err.get_or_insert(e.context(name));
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_waits_for_tasks() {
        let (mut svc, rx) = ServiceHandle::new();
        for name in ["a", "b"] {
            let mut rx = rx.clone();
            svc.attach(name, tokio::spawn(async move {
                rx.wait_for(|stop| *stop).await?;
                Ok::<_, anyhow::Error>(())
            }));
        }
        svc.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_reports_failed_task() {
        let (mut svc, _rx) = ServiceHandle::new();
        svc.attach("boom", tokio::spawn(async { Err(anyhow::anyhow!("bind failed")) }));
        svc.attach("fine", tokio::spawn(async { Ok(()) }));
        let err = svc.shutdown().await.unwrap_err();
        assert!(format!("{err:#}").starts_with("boom"));
    }
}
