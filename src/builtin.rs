use std::collections::{BTreeMap, BTreeSet};

use crate::profiles::{CityBiasProfile, ProfileBook, StyleRules};
use crate::reference::{City, Color, PriceBucket, ReferenceData, SubCategory};

const CITIES: &[(&str, f64, &str, &str)] = &[
    ("Delhi", 14.2, "North", "Tier 1"),
    ("Mumbai", 13.6, "West", "Tier 1"),
    ("Bengaluru", 9.8, "South", "Tier 1"),
    ("Hyderabad", 7.3, "South", "Tier 1"),
    ("Chennai", 6.5, "South", "Tier 1"),
    ("Kolkata", 6.1, "East", "Tier 1"),
    ("Pune", 5.4, "West", "Tier 1"),
    ("Ahmedabad", 4.7, "West", "Tier 2"),
    ("Jaipur", 2.9, "North", "Tier 2"),
    ("Lucknow", 2.4, "North", "Tier 2"),
];

const CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    (
        "Ethnic Wear",
        &[
            ("Saree", "saree"),
            ("Kurta", "kurta"),
            ("Lehenga", "lehenga"),
            ("Salwar Kameez", "salwar kameez"),
            ("Sherwani", "sherwani"),
            ("Dhoti", "dhoti"),
        ],
    ),
    (
        "Western Wear",
        &[
            ("Jeans", "jeans"),
            ("Blazer", "blazer"),
            ("Crop Top", "crop top"),
            ("Co-ord Set", "co-ord set"),
            ("Mini Dress", "mini dress"),
            ("Trench Coat", "trench coat"),
        ],
    ),
    (
        "Fusion Wear",
        &[
            ("Indo Western", "indo western"),
            ("Sharara Top", "sharara top"),
            ("Kurti with Jeans", "kurti jeans"),
            ("Jacket Kurta", "jacket kurta"),
            ("Dhoti Pants", "dhoti pants"),
        ],
    ),
    (
        "Streetwear",
        &[
            ("Oversized Hoodie", "oversized hoodie"),
            ("Cargo Pants", "cargo pants"),
            ("Sneakers", "sneakers India"),
            ("Graphic Tee", "graphic t shirt"),
            ("Bucket Hat", "bucket hat"),
        ],
    ),
    (
        "Occasion Wear",
        &[
            ("Wedding Outfit", "wedding outfit India"),
            ("Party Wear", "party wear"),
            ("Festive Wear", "festive wear"),
            ("Reception Gown", "reception outfit"),
            ("Mehendi Outfit", "mehendi outfit"),
        ],
    ),
    (
        "Sustainable",
        &[
            ("Handloom Saree", "handloom saree"),
            ("Khadi", "khadi fashion"),
            ("Upcycled Clothing", "upcycled clothing"),
            ("Organic Cotton", "organic cotton"),
            ("Linen Shirt", "linen shirt"),
        ],
    ),
];

const PRICE_BUCKETS: &[(&str, u32, u32, u32)] = &[
    ("Under ₹500", 0, 499, 250),
    ("₹500–₹1,000", 500, 999, 750),
    ("₹1,000–₹2,500", 1_000, 2_499, 1_750),
    ("₹2,500–₹5,000", 2_500, 4_999, 3_750),
    ("₹5,000–₹10,000", 5_000, 9_999, 7_500),
    ("₹10,000+", 10_000, 100_000, 15_000),
];

const COLORS: &[(&str, &str, &str)] = &[
    ("Crimson", "#9b1313", "Reds & Pinks"),
    ("Hot Pink", "#ff006e", "Reds & Pinks"),
    ("Blush", "#ffb3c6", "Reds & Pinks"),
    ("Maroon", "#5c0a1a", "Reds & Pinks"),
    ("Royal Blue", "#003087", "Blues"),
    ("Electric Blue", "#3a86ff", "Blues"),
    ("Powder Blue", "#c7ceea", "Blues"),
    ("Emerald", "#046307", "Greens"),
    ("Mint", "#b5ead7", "Greens"),
    ("Olive", "#6b7d2a", "Greens"),
    ("Mustard", "#e1ad01", "Yellows & Oranges"),
    ("Saffron", "#ff9933", "Yellows & Oranges"),
    ("Peach", "#ffdac1", "Yellows & Oranges"),
    ("Terracotta", "#c4793a", "Earth Tones"),
    ("Rust", "#8b4513", "Earth Tones"),
    ("Beige", "#e8c4a0", "Earth Tones"),
    ("Lavender", "#b497d6", "Purples"),
    ("Plum", "#5e2750", "Purples"),
    ("Ivory", "#fffff0", "Neutrals"),
    ("Black", "#111111", "Neutrals"),
    ("Grey", "#888888", "Neutrals"),
    ("Gold", "#ffd700", "Metallics"),
    ("Silver", "#c0c0c0", "Metallics"),
    ("Bronze", "#cd7f32", "Metallics"),
];

struct ProfileRow {
    city: &'static str,
    western: f64,
    ethnic: f64,
    streetwear: f64,
    luxury: f64,
    budget: f64,
    colors: &'static [(&'static str, f64)],
}

const PROFILES: &[ProfileRow] = &[
    ProfileRow {
        city: "Delhi",
        western: 1.10,
        ethnic: 1.25,
        streetwear: 1.05,
        luxury: 1.35,
        budget: 0.95,
        colors: &[("Crimson", 1.20), ("Gold", 1.25), ("Maroon", 1.15)],
    },
    ProfileRow {
        city: "Mumbai",
        western: 1.30,
        ethnic: 1.00,
        streetwear: 1.20,
        luxury: 1.40,
        budget: 0.90,
        colors: &[("Black", 1.25), ("Beige", 1.15), ("Electric Blue", 1.10)],
    },
    ProfileRow {
        city: "Bengaluru",
        western: 1.25,
        ethnic: 0.95,
        streetwear: 1.35,
        luxury: 1.10,
        budget: 1.00,
        colors: &[("Black", 1.20), ("Olive", 1.20), ("Grey", 1.10)],
    },
    ProfileRow {
        city: "Hyderabad",
        western: 1.05,
        ethnic: 1.20,
        streetwear: 1.10,
        luxury: 1.20,
        budget: 1.00,
        colors: &[("Emerald", 1.20), ("Gold", 1.15)],
    },
    ProfileRow {
        city: "Chennai",
        western: 0.95,
        ethnic: 1.30,
        streetwear: 0.95,
        luxury: 1.15,
        budget: 1.05,
        colors: &[("Mustard", 1.20), ("Ivory", 1.25), ("Gold", 1.20)],
    },
    ProfileRow {
        city: "Kolkata",
        western: 0.95,
        ethnic: 1.30,
        streetwear: 0.90,
        luxury: 0.95,
        budget: 1.20,
        colors: &[("Crimson", 1.30), ("Ivory", 1.20)],
    },
    ProfileRow {
        city: "Pune",
        western: 1.20,
        ethnic: 1.00,
        streetwear: 1.25,
        luxury: 0.95,
        budget: 1.10,
        colors: &[("Black", 1.10), ("Mint", 1.10)],
    },
    ProfileRow {
        city: "Ahmedabad",
        western: 0.95,
        ethnic: 1.25,
        streetwear: 0.90,
        luxury: 1.00,
        budget: 1.15,
        colors: &[("Saffron", 1.25), ("Hot Pink", 1.15)],
    },
    ProfileRow {
        city: "Jaipur",
        western: 0.85,
        ethnic: 1.35,
        streetwear: 0.80,
        luxury: 0.90,
        budget: 1.25,
        colors: &[("Hot Pink", 1.30), ("Terracotta", 1.25), ("Saffron", 1.15)],
    },
    ProfileRow {
        city: "Lucknow",
        western: 0.85,
        ethnic: 1.30,
        streetwear: 0.85,
        luxury: 0.85,
        budget: 1.30,
        colors: &[("Ivory", 1.20), ("Powder Blue", 1.15)],
    },
];

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_styles() -> StyleRules {
    StyleRules {
        western: set(&["Western Wear"]),
        ethnic: set(&["Ethnic Wear", "Occasion Wear"]),
        streetwear: set(&["Streetwear"]),
        neutral: set(&["Fusion Wear", "Sustainable"]),
        luxury_prone: set(&["Ethnic Wear", "Occasion Wear", "Western Wear"]),
        budget_prone: set(&["Streetwear", "Ethnic Wear", "Western Wear", "Fusion Wear"]),
        luxury_tier: set(&["₹5,000–₹10,000", "₹10,000+"]),
        budget_tier: set(&["Under ₹500", "₹500–₹1,000"]),
    }
}

pub fn builtin_profiles() -> ProfileBook {
    let profiles: BTreeMap<String, CityBiasProfile> = PROFILES
        .iter()
        .map(|row| {
            let profile = CityBiasProfile {
                western: row.western,
                ethnic: row.ethnic,
                streetwear: row.streetwear,
                luxury: row.luxury,
                budget: row.budget,
                colors: row
                    .colors
                    .iter()
                    .map(|(name, mult)| (name.to_string(), *mult))
                    .collect(),
            };
            (row.city.to_string(), profile)
        })
        .collect();
    ProfileBook(profiles)
}

pub fn builtin_reference() -> ReferenceData {
    ReferenceData {
        cities: CITIES
            .iter()
            .map(|(name, market_bn, region, tier)| City {
                name: name.to_string(),
                market_bn: *market_bn,
                region: region.to_string(),
                tier: tier.to_string(),
            })
            .collect(),
        subcategories: CATEGORIES
            .iter()
            .flat_map(|(group, subs)| {
                subs.iter().map(move |(name, phrase)| SubCategory {
                    name: name.to_string(),
                    group: group.to_string(),
                    search_phrase: phrase.to_string(),
                })
            })
            .collect(),
        price_buckets: PRICE_BUCKETS
            .iter()
            .map(|(label, low, high, midpoint)| PriceBucket {
                label: label.to_string(),
                low: *low,
                high: *high,
                midpoint: *midpoint,
            })
            .collect(),
        colors: COLORS
            .iter()
            .map(|(name, hex, family)| Color {
                name: name.to_string(),
                hex: hex.to_string(),
                family: family.to_string(),
            })
            .collect(),
        styles: builtin_styles(),
        profiles: builtin_profiles(),
    }
}
