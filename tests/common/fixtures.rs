//! Test fixtures for integration tests.

#![allow(dead_code)]

use mongodb::bson::{Document, doc, oid::ObjectId};

/// The two documents from the `id`/`_id` elision scenario.
pub fn identifier_scenario() -> Vec<Document> {
    vec![
        doc! { "_id": 1, "id": "x", "Age": "na" },
        doc! { "_id": 2, "Age": 30, "Gender": "na" },
    ]
}

/// Insurance-style rows with a mix of sentinels, nulls and nested values.
pub fn customer_documents() -> Vec<Document> {
    vec![
        doc! {
            "_id": ObjectId::parse_str("6283a37e34d71078c4996c72").unwrap(),
            "id": 1,
            "Gender": "Male",
            "Age": 44,
            "Region_Code": 28.0,
            "Vehicle_Damage": "Yes",
            "Response": 1,
        },
        doc! {
            "_id": ObjectId::parse_str("6283a37e34d71078c4996c73").unwrap(),
            "id": 2,
            "Gender": "na",
            "Age": 76,
            "Region_Code": 3.0,
            "Vehicle_Damage": "No",
            "Response": 0,
        },
        doc! {
            "_id": ObjectId::parse_str("6283a37e34d71078c4996c74").unwrap(),
            "id": 3,
            "Gender": "Female",
            "Age": "na",
            "Vehicle_Damage": null,
            "Response": 1,
            "Policy": { "channel": 152, "tags": ["renewal", "na"] },
        },
    ]
}

/// `count` flat documents numbered from zero.
pub fn numbered_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "index": i as i32,
                "name": format!("Document {}", i),
                "category": if i % 2 == 0 { "even" } else { "na" },
            }
        })
        .collect()
}
