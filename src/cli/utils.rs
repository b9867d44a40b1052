use serde_json::{json, Value};

use crate::cli::{Credentials, OutputFormat};
use crate::client::PortalClient;
use crate::session::Session;
use crate::types::DocumentRecord;

/// Establish the per-invocation portal session
pub async fn establish_session(credentials: &Credentials) -> anyhow::Result<Session> {
    let client = PortalClient::from_config()?;
    let session = Session::login(client, &credentials.email, &credentials.password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;
    Ok(session)
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                if let Some(obj) = response.as_object_mut() {
                    obj.extend(extra);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Render one listing page of documents
pub fn output_document_page(
    output_format: &OutputFormat,
    documents: &[DocumentRecord],
    total: u64,
    page: u64,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "documents": documents,
                    "total": total,
                    "page": page
                }))?
            );
        }
        OutputFormat::Text => {
            if documents.is_empty() {
                println!("No documents found");
                return Ok(());
            }
            println!("{} document(s), page {} ({} total)", documents.len(), page, total);
            for doc in documents {
                let deleted = if doc.is_deleted {
                    match &doc.deleted_by_name {
                        Some(name) => format!("  [deleted by {}]", name),
                        None => "  [deleted]".to_string(),
                    }
                } else {
                    String::new()
                };
                println!(
                    "  {}  {}  {}  {}  issued {}{}",
                    doc.doc_encrypted_id,
                    doc.doc_owner_ic,
                    doc.doc_owner_name,
                    doc.document_type,
                    doc.issue_date,
                    deleted
                );
            }
        }
    }
    Ok(())
}
