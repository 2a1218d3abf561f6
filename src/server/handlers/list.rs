//! Module with the handlers for listing templates and categories.

use hyper::{Response, StatusCode};

use crate::backend::Backend;
use super::util::{error_response, json_response, Body};


/// List all templates in the catalog.
pub fn templates(backend: &Backend) -> Response<Body> {
    let templates = backend.list_templates();
    debug!("Listing all {} template(s)", templates.len());
    json_response(templates)
}

/// List the popular templates.
pub fn popular_templates(backend: &Backend) -> Response<Body> {
    let templates = backend.catalog().popular();
    debug!("Listing {} popular template(s)", templates.len());
    json_response(&templates)
}

/// List the trending templates.
pub fn trending_templates(backend: &Backend) -> Response<Body> {
    let templates = backend.catalog().trending();
    debug!("Listing {} trending template(s)", templates.len());
    json_response(&templates)
}

/// List templates in the category with given slug.
///
/// The pseudo-category `all` has every template.
pub fn category_templates(backend: &Backend, slug: &str) -> Response<Body> {
    match backend.catalog().templates_in_category(slug) {
        Some(templates) => {
            debug!("Listing {} template(s) in category `{}`", templates.len(), slug);
            json_response(&templates)
        }
        None => {
            debug!("Category `{}` doesn't exist", slug);
            error_response(StatusCode::NOT_FOUND, "Category not found")
        }
    }
}

/// List all template categories.
pub fn categories(backend: &Backend) -> Response<Body> {
    let categories = backend.list_categories();
    debug!("Listing all {} categories", categories.len());
    json_response(categories)
}
