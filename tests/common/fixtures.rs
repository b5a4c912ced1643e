use serde_json::{Value, json};

/// The invoice cover: no query, a locale and a decimal total.
pub fn invoice_design() -> Value {
    json!({
        "name": "invoice",
        "title": "Invoice",
        "parameters": [
            { "name": "REPORT_LOCALE", "class": "java.util.Locale" },
            { "name": "total", "class": "java.math.BigDecimal" },
            { "name": "customer", "class": "java.lang.String" }
        ]
    })
}

/// A list report reading records through a path query.
pub fn listing_design(rows_per_page: usize) -> Value {
    json!({
        "name": "listing",
        "title": "Products",
        "query": { "language": "xpath", "text": "/data/record" },
        "fields": [
            { "name": "name" },
            { "name": "price", "kind": "number" }
        ],
        "rowsPerPage": rows_per_page
    })
}

pub fn products_xml(count: usize) -> String {
    let mut xml = String::from("<data>");
    for i in 0..count {
        xml.push_str(&format!("<record><name>Item {i}</name><price>{i}.50</price></record>"));
    }
    xml.push_str("</data>");
    xml
}

pub fn products_csv(count: usize) -> String {
    let mut csv = String::from("name,price\n");
    for i in 0..count {
        csv.push_str(&format!("Item {i},{i}.50\n"));
    }
    csv
}
