mod common;

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ttl_shortener::domain::notification::Notification;
use ttl_shortener::infrastructure::mail::{MailError, Mailer};
use ttl_shortener::workers::run_mail_worker;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

async fn wait_for(mailer: &RecordingMailer, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while mailer.sent.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("mail worker did not deliver in time");
}

#[tokio::test]
async fn test_worker_delivers_deactivation_emails() {
    let app = common::create_test_app();
    let server = app.server();
    let auth = common::sign_up(&server, "owner@example.com").await;
    let code = common::create_link(&server, &auth, "AFTER_THE_LINK").await;

    let mailer = Arc::new(RecordingMailer::default());
    let worker = tokio::spawn(run_mail_worker(
        app.queue.clone(),
        mailer.clone(),
        Duration::from_millis(20),
    ));

    server.get(&format!("/{code}")).await.assert_status_ok();
    wait_for(&mailer, 1).await;

    // The failed second visit sends nothing more
    server.get(&format!("/{code}")).await.assert_status_not_found();
    tokio::time::sleep(Duration::from_millis(100)).await;
    worker.abort();

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "owner@example.com");
    assert_eq!(app.queue.pending(), 0);
}
