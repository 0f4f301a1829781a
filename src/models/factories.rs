//! Randomized valid products for tests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use super::{Category, Product};

static ADJECTIVES: &[&str] = &[
    "Premium", "Deluxe", "Classic", "Smart", "Eco", "Compact", "Portable", "Heavy-Duty",
    "Lightweight", "Essential", "Signature", "Standard",
];

static NOUNS: &[&str] = &[
    "Hat", "Coat", "Bread", "Kettle", "Wrench", "Tire", "Scarf", "Cheese", "Lamp", "Hammer",
];

static DESCRIPTIONS: &[&str] = &[
    "Built to last",
    "A customer favourite",
    "Limited edition",
    "Imported",
    "Locally sourced",
];

pub struct ProductFactory {
    rng: StdRng,
}

impl Default for ProductFactory {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ProductFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transient product with random but valid attributes.
    pub fn build(&mut self) -> Product {
        let adj = ADJECTIVES.choose(&mut self.rng).unwrap_or(&"Standard");
        let noun = NOUNS.choose(&mut self.rng).unwrap_or(&"Hat");
        let description = if self.rng.gen_bool(0.8) {
            DESCRIPTIONS.choose(&mut self.rng).map(|d| d.to_string())
        } else {
            None
        };
        let price = Decimal::new(self.rng.gen_range(50..=100_000), 2);
        let category = *Category::ALL.choose(&mut self.rng).unwrap_or(&Category::Unknown);

        Product::new(
            format!("{} {}", adj, noun),
            description,
            price,
            self.rng.gen_bool(0.5),
            category,
        )
    }
}
