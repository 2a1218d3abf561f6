//! The built-in catalog.

use super::{Catalog, Category, TemplateEntry};


const CATEGORIES: &[(u32, &str, &str)] = &[
    (1, "All", "all"),
    (2, "Bollywood", "bollywood"),
    (3, "Cricket", "cricket"),
    (4, "Politics", "politics"),
    (5, "Trending", "trending"),
    (6, "Classic", "classic"),
];

/// Templates as (id, name, slug, Unsplash photo id, category id, popular, trending).
const TEMPLATES: &[(u32, &str, &str, &str, u32, bool, bool)] = &[
    (1, "Shocked Babu Bhaiya", "shocked-babu-bhaiya", "1493225457124-a3eb161ffa5f", 2, true, true),
    (2, "Hera Pheri Paisa", "hera-pheri-paisa", "1569003339405-ea396a5a8a90", 2, true, false),
    (3, "Kabhi Khushi", "kabhi-khushi", "1447684808650-354ae64db5b8", 2, true, false),
    (4, "Cricket Celebration", "cricket-celebration", "1504639725590-34d0984388bd", 3, true, true),
    (5, "Kohli Angry", "kohli-angry", "1444703686981-a3abbc4d4fe3", 3, true, false),
    (6, "Political Face", "political-face", "1490971588422-52f6262a237a", 4, false, true),
    (7, "Viral Trend", "viral-trend", "1528642474498-1af0c17fd8c3", 5, true, true),
    (8, "Classic Meme", "classic-meme", "1585366119957-e9730b6d0f60", 6, false, false),
];


pub(super) fn catalog() -> Catalog {
    let categories = CATEGORIES.iter()
        .map(|&(id, name, slug)| Category{id, name: name.into(), slug: slug.into()})
        .collect();
    let templates = TEMPLATES.iter()
        .map(|&(id, name, slug, photo, category_id, popular, trending)| TemplateEntry{
            id,
            name: name.into(),
            slug: slug.into(),
            image_url: format!(
                "https://images.unsplash.com/photo-{}?auto=format&fit=crop&w=500&h=350&q=80", photo),
            category_id: Some(category_id),
            popular,
            trending,
        })
        .collect();
    Catalog{categories, templates}
}
