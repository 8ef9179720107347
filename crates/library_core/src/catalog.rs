use shared::domain::{Category, CategoryId, Locale};

struct CategorySeed {
    id: &'static str,
    name_ar: &'static str,
    name_en: &'static str,
    icon: &'static str,
}

const CATEGORY_SEEDS: [CategorySeed; 8] = [
    CategorySeed {
        id: CategoryId::ALL,
        name_ar: "جميع الكتب",
        name_en: "All books",
        icon: "fas fa-book",
    },
    CategorySeed {
        id: "programming",
        name_ar: "البرمجة",
        name_en: "Programming",
        icon: "fas fa-code",
    },
    CategorySeed {
        id: "arts",
        name_ar: "الفنون",
        name_en: "Arts",
        icon: "fas fa-palette",
    },
    CategorySeed {
        id: "science",
        name_ar: "العلوم",
        name_en: "Science",
        icon: "fas fa-microscope",
    },
    CategorySeed {
        id: "history",
        name_ar: "التاريخ",
        name_en: "History",
        icon: "fas fa-history",
    },
    CategorySeed {
        id: "literature",
        name_ar: "الأدب",
        name_en: "Literature",
        icon: "fas fa-heart",
    },
    CategorySeed {
        id: "economics",
        name_ar: "الاقتصاد",
        name_en: "Economics",
        icon: "fas fa-chart-line",
    },
    CategorySeed {
        id: "education",
        name_ar: "التعليم",
        name_en: "Education",
        icon: "fas fa-graduation-cap",
    },
];

/// Fixed, ordered category taxonomy. The catch-all entry comes first.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    categories: Vec<Category>,
}

impl CatalogRegistry {
    pub fn new(locale: Locale) -> Self {
        let categories = CATEGORY_SEEDS
            .iter()
            .map(|seed| Category {
                id: CategoryId::new(seed.id),
                name: match locale {
                    Locale::Arabic => seed.name_ar,
                    Locale::English => seed.name_en,
                }
                .to_string(),
                icon: seed.icon.to_string(),
            })
            .collect();
        Self { categories }
    }

    pub fn get_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.as_str() == id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.get_category_by_id(id.as_str()).is_some()
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_eight_categories_with_catch_all_first() {
        let catalog = CatalogRegistry::default();
        let categories = catalog.get_categories();
        assert_eq!(categories.len(), 8);
        assert!(categories[0].id.is_all());
        assert_eq!(categories[1].name, "البرمجة");
    }

    #[test]
    fn looks_up_by_slug() {
        let catalog = CatalogRegistry::new(Locale::English);
        let science = catalog.get_category_by_id("science").expect("science");
        assert_eq!(science.name, "Science");
        assert_eq!(science.icon, "fas fa-microscope");
        assert!(catalog.get_category_by_id("cooking").is_none());
    }

    #[test]
    fn ids_are_stable_across_locales() {
        let ar = CatalogRegistry::new(Locale::Arabic);
        let en = CatalogRegistry::new(Locale::English);
        let ar_ids: Vec<_> = ar.get_categories().iter().map(|c| &c.id).collect();
        let en_ids: Vec<_> = en.get_categories().iter().map(|c| &c.id).collect();
        assert_eq!(ar_ids, en_ids);
    }
}
