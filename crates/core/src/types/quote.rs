//! Literary quotes

use serde::{Deserialize, Serialize};

/// A quote and its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// The quote selected for one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    /// Calendar day this record was selected for
    pub date_stamp: String,
}

impl QuoteRecord {
    pub fn new(quote: Quote, date_stamp: impl Into<String>) -> Self {
        Self {
            text: quote.text,
            author: quote.author,
            date_stamp: date_stamp.into(),
        }
    }
}
