//! Population fragments
//!
//! Small constructors for the join stages entities combine in their populate list.
//! References always point at `_id` of the foreign collection.

use mongodb::bson::{doc, Document};

/// `$lookup` replacing `local_field` with the matching documents of `from`.
pub fn lookup(from: &str, local_field: &str, as_field: &str) -> Document {
    doc! {
        "$lookup": {
            "from": from,
            "localField": local_field,
            "foreignField": "_id",
            "as": as_field,
        }
    }
}

/// `$unwind`; with `preserve` documents whose array is missing or empty are kept.
pub fn unwind(path: &str, preserve: bool) -> Document {
    doc! {
        "$unwind": {
            "path": format!("${}", path),
            "preserveNullAndEmptyArrays": preserve,
        }
    }
}

/// Populates a single reference: the field ends up holding one document, or is dropped
/// when the reference does not resolve.
pub fn populate_one(from: &str, field: &str) -> Vec<Document> {
    vec![lookup(from, field, field), unwind(field, true)]
}

/// Populates an array of references in place.
pub fn populate_many(from: &str, field: &str) -> Vec<Document> {
    vec![lookup(from, field, field)]
}

/// Drops fields, e.g. secrets of a populated user.
pub fn exclude_fields(fields: &[&str]) -> Document {
    let mut projection = Document::new();
    for field in fields {
        projection.insert(*field, 0);
    }
    doc! { "$project": projection }
}

/// Rebuilds documents that were unwound on `array_field`.
///
/// `kept_fields` are carried over with `$first`; `item_fields` become the members of each
/// pushed array element. The order of the rebuilt array depends on the order the store feeds
/// documents into `$group` and is not guaranteed.
pub fn regroup(kept_fields: &[&str], array_field: &str, item_fields: &[&str]) -> Document {
    let mut group = doc! { "_id": "$_id" };
    for field in kept_fields {
        group.insert(*field, doc! { "$first": format!("${}", field) });
    }

    let mut item = Document::new();
    for field in item_fields {
        item.insert(*field, format!("${}.{}", array_field, field));
    }
    group.insert(array_field, doc! { "$push": item });

    doc! { "$group": group }
}
