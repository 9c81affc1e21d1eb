/// The fixed category catalog.
///
/// Built once at startup and never mutated afterwards. Iteration order is the
/// declaration order of the categories and is load-bearing: search results
/// come back in this order and consumers treat the first match as the best
/// one, so reordering categories changes which guide wins on ambiguous
/// queries ("bottle" resolves to plastic because plastic is declared before
/// glass).
use std::collections::HashMap;

use crate::error::AppError;
use crate::model::Category;

#[derive(Debug)]
pub struct Catalog {
    categories: Vec<Category>,
    by_key: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and index a category list. Keys and keywords are normalized
    /// to lowercase so matching can assume they already are.
    ///
    /// Rejected: an empty list, duplicate keys, and categories without
    /// keywords (they would be unreachable by search).
    pub fn new(categories: Vec<Category>) -> Result<Self, AppError> {
        if categories.is_empty() {
            return Err(AppError::Catalog("category list is empty".to_string()));
        }

        let mut normalized = Vec::with_capacity(categories.len());
        let mut by_key = HashMap::with_capacity(categories.len());

        for (i, mut category) in categories.into_iter().enumerate() {
            category.key = category.key.to_lowercase();
            for keyword in &mut category.keywords {
                *keyword = keyword.to_lowercase();
            }

            if category.keywords.is_empty() {
                return Err(AppError::Catalog(format!(
                    "category '{}' has no keywords",
                    category.key
                )));
            }
            if by_key.insert(category.key.clone(), i).is_some() {
                return Err(AppError::Catalog(format!(
                    "duplicate category key '{}'",
                    category.key
                )));
            }
            normalized.push(category);
        }

        Ok(Self {
            categories: normalized,
            by_key,
        })
    }

    /// Exact-key lookup. `None` for unknown keys; callers no-op rather than
    /// rendering a placeholder guide.
    pub fn lookup(&self, key: &str) -> Option<&Category> {
        self.by_key.get(key).map(|&i| &self.categories[i])
    }

    /// Categories in canonical (declaration) order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The six built-in categories, carried over from the original assistant.
/// Declaration order is canonical (see `Catalog`).
pub fn builtin() -> Vec<Category> {
    vec![
        category(
            "plastic",
            "Plastic Recycling Guide",
            "🧴",
            &["bottle", "container", "bag", "wrapper", "plastic"],
            r#"<h3>♻ How to Recycle Plastic</h3>
<p><strong>Recyclable:</strong> Bottles (water, soda, shampoo), containers (yogurt, margarine), jugs (milk, detergent)</p>
<p><strong>Not Recyclable:</strong> Plastic bags, straws, styrofoam, plastic wrap</p>
<ul>
    <li>Rinse containers before recycling</li>
    <li>Remove caps and lids (check local rules)</li>
    <li>Don't bag recyclables - place loose in bin</li>
</ul>"#,
        ),
        category(
            "paper",
            "Paper Recycling Guide",
            "📄",
            &["newspaper", "cardboard", "magazine", "box", "paper"],
            r#"<h3>♻ How to Recycle Paper</h3>
<p><strong>Recyclable:</strong> Newspapers, magazines, office paper, cardboard boxes, paper bags</p>
<p><strong>Not Recyclable:</strong> Soiled paper, wax-coated paper, receipts, paper towels</p>
<ul>
    <li>Flatten cardboard boxes</li>
    <li>Remove plastic windows from envelopes</li>
    <li>Keep paper dry and clean</li>
</ul>"#,
        ),
        category(
            "glass",
            "Glass Recycling Guide",
            "🍾",
            &["bottle", "jar", "glass", "container"],
            r#"<h3>♻ How to Recycle Glass</h3>
<p><strong>Recyclable:</strong> Bottles (beer, wine, soda), food jars (pasta sauce, jam)</p>
<p><strong>Not Recyclable:</strong> Drinking glasses, ceramics, mirrors, light bulbs</p>
<ul>
    <li>Rinse containers thoroughly</li>
    <li>Remove metal lids (recycle separately)</li>
    <li>Don't break glass - it's harder to recycle</li>
</ul>"#,
        ),
        category(
            "metal",
            "Metal Recycling Guide",
            "🥫",
            &["can", "foil", "metal", "tin"],
            r#"<h3>♻ How to Recycle Metal</h3>
<p><strong>Recyclable:</strong> Aluminum cans, tin cans, clean aluminum foil, empty aerosol cans</p>
<p><strong>Not Recyclable:</strong> Paint cans, propane tanks, scrap metal</p>
<ul>
    <li>Rinse cans to remove food residue</li>
    <li>Flatten aluminum cans if possible</li>
    <li>Check for local scrap metal recycling</li>
</ul>"#,
        ),
        category(
            "organic",
            "Organic Waste Guide",
            "🍎",
            &["food", "compost", "yard", "organic"],
            r#"<h3>♻ How to Handle Organic Waste</h3>
<p><strong>Compostable:</strong> Fruit/vegetable scraps, eggshells, coffee grounds, yard trimmings</p>
<p><strong>Not Compostable:</strong> Meat, dairy, oils, pet waste</p>
<ul>
    <li>Use a compost bin or municipal collection</li>
    <li>Bury food scraps to avoid pests</li>
    <li>Mix "greens" and "browns" for better compost</li>
</ul>"#,
        ),
        category(
            "hazardous",
            "Hazardous Waste Guide",
            "⚠️",
            &["battery", "chemical", "electronic", "hazardous"],
            r#"<h3>⚠ Hazardous Waste Disposal</h3>
<p><strong>Hazardous Items:</strong> Batteries, electronics, paint, chemicals, light bulbs</p>
<p><strong>Safe Disposal:</strong> Never put in regular trash or recycling</p>
<ul>
    <li>Find local hazardous waste collection sites</li>
    <li>Check for retailer take-back programs</li>
    <li>Keep in original containers when possible</li>
</ul>"#,
        ),
    ]
}

fn category(key: &str, title: &str, icon: &str, keywords: &[&str], content: &str) -> Category {
    Category {
        key: key.to_string(),
        title: title.to_string(),
        icon: icon.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::new(builtin()).expect("builtin catalog must validate");
        assert_eq!(catalog.len(), 6);

        let keys: Vec<&str> = catalog.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            ["plastic", "paper", "glass", "metal", "organic", "hazardous"]
        );
    }

    #[test]
    fn lookup_returns_categories_unchanged() {
        let catalog = Catalog::new(builtin()).unwrap();
        for source in builtin() {
            let found = catalog.lookup(&source.key).expect("every key resolves");
            assert_eq!(found.title, source.title);
            assert_eq!(found.content, source.content);
        }
        assert!(catalog.lookup("unobtainium").is_none());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            Catalog::new(Vec::new()),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut categories = builtin();
        categories.push(categories[0].clone());
        assert!(matches!(
            Catalog::new(categories),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn keywordless_category_is_rejected() {
        let mut categories = builtin();
        categories[2].keywords.clear();
        let err = Catalog::new(categories).unwrap_err();
        assert!(err.to_string().contains("glass"));
    }

    #[test]
    fn keys_and_keywords_are_normalized_to_lowercase() {
        let mut categories = builtin();
        categories[0].key = "PLASTIC".to_string();
        categories[0].keywords[0] = "Bottle".to_string();
        let catalog = Catalog::new(categories).unwrap();
        let plastic = catalog.lookup("plastic").expect("key normalized");
        assert_eq!(plastic.keywords[0], "bottle");
    }
}
