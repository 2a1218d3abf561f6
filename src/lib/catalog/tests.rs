//! Tests for the catalog.

use serde_json::json;
use spectral::prelude::*;

use super::{Catalog, Category, Error, TemplateEntry};


fn slugs(templates: Vec<&TemplateEntry>) -> Vec<&str> {
    templates.into_iter().map(|t| t.slug.as_str()).collect()
}


#[test]
fn default_catalog_is_valid() {
    let catalog = Catalog::default();
    let revalidated = Catalog::new(
        catalog.categories().to_vec(), catalog.templates().to_vec());
    assert_that!(revalidated.map(|_| ())).is_ok();
    assert_eq!(6, catalog.categories().len());
    assert_eq!(8, catalog.templates().len());
}

#[test]
fn all_category_has_everything() {
    let catalog = Catalog::default();
    let all = catalog.templates_in_category("all").unwrap();
    assert_eq!(catalog.templates().len(), all.len());
}

#[test]
fn templates_in_category() {
    let catalog = Catalog::default();
    let cricket = catalog.templates_in_category("cricket").unwrap();
    assert_that!(slugs(cricket)).is_equal_to(vec!["cricket-celebration", "kohli-angry"]);
    assert_that!(catalog.templates_in_category("tollywood")).is_none();
}

#[test]
fn popular_and_trending() {
    let catalog = Catalog::default();
    assert!(catalog.popular().iter().all(|t| t.popular));
    assert!(catalog.trending().iter().all(|t| t.trending));
    assert_that!(slugs(catalog.trending())).is_equal_to(vec![
        "shocked-babu-bhaiya", "cricket-celebration", "political-face", "viral-trend"]);
    assert_eq!(6, catalog.popular().len());
}

#[test]
fn lookup() {
    let catalog = Catalog::default();
    assert_that!(catalog.template(5).map(|t| t.name.as_str())).is_some().is_equal_to("Kohli Angry");
    assert_that!(catalog.template(42)).is_none();
    assert_that!(catalog.template_by_slug("viral-trend").map(|t| t.id)).is_some().is_equal_to(7);
}

#[test]
fn serializes_camel_case() {
    let catalog = Catalog::default();
    let json = serde_json::to_value(catalog.template(1).unwrap()).unwrap();
    assert_eq!(json!(2), json["categoryId"]);
    assert_eq!(json!(true), json["popular"]);
    assert!(json["imageUrl"].as_str().unwrap().starts_with("https://"));
}

#[test]
fn from_reader() {
    let json = r#"{
        "categories": [{"id": 1, "name": "Classic", "slug": "classic"}],
        "templates": [
            {"id": 10, "name": "Doge", "slug": "doge", "imageUrl": "/doge.png", "categoryId": 1},
            {"id": 11, "name": "Drake", "slug": "drake", "imageUrl": "/drake.png", "popular": true}
        ]
    }"#;
    let catalog = Catalog::from_reader(json.as_bytes()).unwrap();
    assert_eq!(vec![Category{id: 1, name: "Classic".into(), slug: "classic".into()}],
        catalog.categories().to_vec());
    assert_that!(slugs(catalog.templates_in_category("classic").unwrap()))
        .is_equal_to(vec!["doge"]);
    assert_that!(slugs(catalog.popular())).is_equal_to(vec!["drake"]);
}

#[test]
fn invalid_catalogs() {
    let unknown_category = r#"{"templates": [
        {"id": 1, "name": "Doge", "slug": "doge", "imageUrl": "/doge.png", "categoryId": 3}
    ]}"#;
    assert_that!(Catalog::from_reader(unknown_category.as_bytes())).is_err();

    let duplicate = vec![
        Category{id: 1, name: "A".into(), slug: "a".into()},
        Category{id: 2, name: "B".into(), slug: "a".into()},
    ];
    assert_that!(Catalog::new(duplicate, vec![])).is_err()
        .matches(|e| matches!(*e, Error::DuplicateCategory(ref s) if s == "a"));

    assert_that!(Catalog::from_reader(&b"[1, 2"[..])).is_err();
}
