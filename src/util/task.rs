use std::collections::HashMap;

use tokio::task::JoinHandle;
use tracing::debug;

/// Background jobs keyed by purpose. Spawning under a key that is still
/// running aborts the older job.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<&'static str, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, key: &'static str, task: JoinHandle<()>) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = self.tasks.insert(key, task) {
            debug!(key, "task_superseded");
            previous.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn respawning_a_key_aborts_the_old_task() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = flume::unbounded::<u8>();

        let slow_tx = tx.clone();
        tasks.spawn(
            "catalog",
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let _ = slow_tx.send(1);
            }),
        );
        tasks.spawn(
            "catalog",
            tokio::spawn(async move {
                let _ = tx.send(2);
            }),
        );

        assert_eq!(rx.recv_async().await.unwrap(), 2);
        assert!(rx.recv_async().await.is_err());
        assert_eq!(tasks.tasks.len(), 1);
    }
}
