//! Quote of the day

use crate::rotation::DailyRotationSelector;
use bookfinder_core::{Quote, QuoteRecord};
use bookfinder_storage::{keys, PersistentStore};
use chrono::{Local, NaiveDate};

const QUOTES: [(&str, &str); 6] = [
    (
        "A reader lives a thousand lives before he dies. The man who never reads lives only one.",
        "George R.R. Martin",
    ),
    (
        "The only thing that you absolutely have to know is the location of the library.",
        "Albert Einstein",
    ),
    ("Books are a uniquely portable magic.", "Stephen King"),
    (
        "A room without books is like a body without a soul.",
        "Marcus Tullius Cicero",
    ),
    ("So many books, so little time.", "Frank Zappa"),
    (
        "Reading is to the mind what exercise is to the body.",
        "Joseph Addison",
    ),
];

/// The rotating quotes, in rotation order
pub fn quote_catalogue() -> Vec<Quote> {
    QUOTES
        .iter()
        .map(|(text, author)| Quote::new(*text, *author))
        .collect()
}

fn selector(store: &PersistentStore) -> DailyRotationSelector<Quote> {
    DailyRotationSelector::new(store.clone(), keys::QUOTE_DATE, keys::QUOTE)
}

/// Today's quote, selected once per local calendar day
pub fn quote_of_the_day(store: &PersistentStore) -> Option<QuoteRecord> {
    quote_for(store, Local::now().date_naive())
}

/// The quote for `date`
pub fn quote_for(store: &PersistentStore, date: NaiveDate) -> Option<QuoteRecord> {
    selector(store)
        .select_for(date, &quote_catalogue())
        .map(|selection| QuoteRecord::new(selection.item, selection.date_stamp))
}
