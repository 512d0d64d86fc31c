//! Payment receipt metadata
//!
//! The receipt file itself lives in external storage; the domain keeps only
//! a pointer to it. Each receipt backs at most one inscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ReceiptId;

/// Metadata for an uploaded payment receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier
    pub id: ReceiptId,
    /// Location in the storage backend
    pub storage_path: String,
    /// MIME type of the uploaded file
    pub mime_type: String,
    /// Filename as submitted by the uploader
    pub original_filename: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl Receipt {
    /// Creates receipt metadata for a file already persisted in storage
    pub fn from_stored(stored: StoredReceipt) -> Self {
        Self {
            id: ReceiptId::new_v7(),
            storage_path: stored.path,
            mime_type: stored.mime_type,
            original_filename: stored.filename,
            uploaded_at: Utc::now(),
        }
    }
}

/// Result of handing a receipt file to the storage backend
#[derive(Debug, Clone)]
pub struct StoredReceipt {
    pub path: String,
    pub mime_type: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_from_stored_keeps_metadata() {
        let receipt = Receipt::from_stored(StoredReceipt {
            path: "receipts/2026/08/abc123.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            filename: "transferencia.pdf".to_string(),
        });

        assert_eq!(receipt.storage_path, "receipts/2026/08/abc123.pdf");
        assert_eq!(receipt.mime_type, "application/pdf");
        assert_eq!(receipt.original_filename, "transferencia.pdf");
    }
}
