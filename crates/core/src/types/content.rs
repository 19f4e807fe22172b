//! Site content: the home page hero banner and the category list.
//!
//! There is exactly one [`SiteContent`] document for the whole site; it is
//! always read and written as a single blob.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A shop category card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Home page hero banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub headline: String,
    pub subheadline: String,
    pub image: String,
}

/// The global site content singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: Hero,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SiteContent {
    /// Look up a category by slug.
    #[must_use]
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Replace the image of the category with `id`.
    ///
    /// Returns `false` if no category has that id.
    pub fn set_category_image(&mut self, id: &CategoryId, image: String) -> bool {
        match self.categories.iter_mut().find(|c| c.id == *id) {
            Some(category) => {
                category.image = image;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn content() -> SiteContent {
        SiteContent {
            hero: Hero {
                headline: "ZOCO".to_string(),
                subheadline: "Wear it".to_string(),
                image: "hero.jpg".to_string(),
            },
            categories: vec![Category {
                id: CategoryId::new("1"),
                name: "T-Shirts".to_string(),
                slug: "t-shirts".to_string(),
                image: "old.jpg".to_string(),
                description: None,
            }],
        }
    }

    #[test]
    fn test_set_category_image() {
        let mut content = content();
        assert!(content.set_category_image(&CategoryId::new("1"), "new.jpg".to_string()));
        assert_eq!(content.category("t-shirts").unwrap().image, "new.jpg");
        assert!(!content.set_category_image(&CategoryId::new("9"), "x.jpg".to_string()));
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let parsed: SiteContent = serde_json::from_str(
            r#"{"hero":{"headline":"h","subheadline":"s","image":"i"}}"#,
        )
        .unwrap();
        assert!(parsed.categories.is_empty());
    }
}
