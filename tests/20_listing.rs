mod common;

use anyhow::Result;
use sijil_portal::client::PortalClient;
use sijil_portal::types::DocumentType;
use sijil_portal::workflow::listing::{DocumentLister, ListingScope, ITEMS_PER_PAGE};

const OWNER_IC: &str = "900101-01-5555";

#[tokio::test]
async fn listing_pages_are_served_with_the_total_count() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    for n in 1..=15 {
        portal.seed_active(common::document(n, OWNER_IC, "Aminah binti Hassan", "IC"));
    }

    let client = PortalClient::new(&portal.base_url)?;
    let mut lister = DocumentLister::new(client, ListingScope::Active);
    assert!(lister.input_owner_ic(OWNER_IC).is_none());

    lister.search(0).await?;
    assert_eq!(lister.documents().len(), ITEMS_PER_PAGE as usize);
    assert_eq!(lister.total(), 15);
    assert_eq!(lister.current_page(), 0);
    assert_eq!(lister.page_count(), 2);

    lister.search(1).await?;
    assert_eq!(lister.documents().len(), 5);
    assert_eq!(lister.current_page(), 1);
    Ok(())
}

#[tokio::test]
async fn emptied_page_falls_back_to_the_last_valid_page() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    for n in 1..=15 {
        portal.seed_soft_deleted(common::document(n, OWNER_IC, "Aminah binti Hassan", "IC"));
    }

    let client = PortalClient::new(&portal.base_url)?;
    let mut lister = DocumentLister::new(client, ListingScope::SoftDeleted);
    assert!(lister.input_owner_ic(OWNER_IC).is_none());

    // Page 2 no longer exists for 15 matches; the fetcher must land on
    // page 1 instead of presenting an empty listing
    lister.search(2).await?;

    assert_eq!(lister.current_page(), 1);
    assert_eq!(lister.documents().len(), 5);
    assert_eq!(lister.total(), 15);
    Ok(())
}

#[tokio::test]
async fn soft_delete_moves_the_document_to_the_deleted_listing() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    portal.seed_active(common::document(1, OWNER_IC, "Aminah binti Hassan", "IC"));

    let client = PortalClient::new(&portal.base_url)?;
    client.delete_document("enc-1", common::ACCOUNT_ID).await?;

    let mut active = DocumentLister::new(client.clone(), ListingScope::Active);
    assert!(active.input_owner_ic(OWNER_IC).is_none());
    active.search(0).await?;
    assert_eq!(active.total(), 0);

    let mut deleted = DocumentLister::new(client, ListingScope::SoftDeleted);
    assert!(deleted.input_owner_ic(OWNER_IC).is_none());
    deleted.search(0).await?;
    assert_eq!(deleted.total(), 1);

    let doc = &deleted.documents()[0];
    assert!(doc.is_deleted);
    assert_eq!(doc.deleted_by.as_deref(), Some(common::ACCOUNT_ID));
    assert!(doc.deleted_at.is_some());
    Ok(())
}

#[tokio::test]
async fn document_type_filter_narrows_the_listing() -> Result<()> {
    let portal = common::TestPortal::spawn().await?;
    portal.seed_active(common::document(1, OWNER_IC, "Aminah binti Hassan", "IC"));
    portal.seed_active(common::document(
        2,
        OWNER_IC,
        "Aminah binti Hassan",
        "BRG_PENGESAHAN_BRN",
    ));

    let client = PortalClient::new(&portal.base_url)?;
    let mut lister = DocumentLister::new(client, ListingScope::Active);
    assert!(lister.input_owner_ic(OWNER_IC).is_none());
    lister.set_doc_type(Some(DocumentType::BrgPengesahanBrn));

    lister.search(0).await?;
    assert_eq!(lister.total(), 1);
    assert_eq!(lister.documents()[0].doc_encrypted_id, "enc-2");
    Ok(())
}
