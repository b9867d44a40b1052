mod common;

use anyhow::Result;
use sijil_portal::client::PortalClient;
use sijil_portal::notify::NotificationFeed;

#[tokio::test]
async fn feed_loads_newest_first() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    portal.state().notifications.extend([
        common::notification("n1", "Document enc-1 recovered", "2024-06-01T09:00:00Z", true),
        common::notification("n3", "Document enc-3 edited", "2024-06-03T09:00:00Z", false),
        common::notification("n2", "Document enc-2 deleted", "2024-06-02T09:00:00Z", false),
    ]);

    let client = PortalClient::new(&portal.base_url)?;
    let feed = NotificationFeed::load(client, common::ACCOUNT_ID).await?;

    let ids: Vec<&str> = feed
        .notifications()
        .iter()
        .map(|n| n.notification_id.as_str())
        .collect();
    assert_eq!(ids, vec!["n3", "n2", "n1"]);
    assert!(feed.has_unread());
    Ok(())
}

#[tokio::test]
async fn mark_read_updates_the_server_and_the_feed() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    portal.state().notifications.extend([
        common::notification("n1", "Document enc-1 recovered", "2024-06-01T09:00:00Z", false),
        common::notification("n2", "Document enc-2 deleted", "2024-06-02T09:00:00Z", false),
    ]);

    let client = PortalClient::new(&portal.base_url)?;
    let mut feed = NotificationFeed::load(client, common::ACCOUNT_ID).await?;

    feed.mark_read("n1").await?;
    assert!(feed
        .notifications()
        .iter()
        .find(|n| n.notification_id == "n1")
        .is_some_and(|n| n.has_read));
    assert!(feed.has_unread(), "n2 is still unread");
    {
        let state = portal.state();
        let server_n1 = state
            .notifications
            .iter()
            .find(|n| n["notification_id"] == "n1")
            .unwrap();
        assert_eq!(server_n1["has_read"], true);
    }

    feed.mark_all_read().await?;
    assert!(!feed.has_unread());
    let state = portal.state();
    assert!(state.notifications.iter().all(|n| n["has_read"] == true));
    Ok(())
}
