//! Fixture catalog used to seed development stores.
//!
//! Four categories with four products each. Stock states are deliberately
//! mixed: fully stocked, sold out in every size, and sold out in some sizes
//! only, so the storefront is exercisable without a database.

use boutique_core::{CategoryId, NewCategory, NewProduct, Price, SizeStock};
use rust_decimal::Decimal;

/// A category and the products that belong to it.
#[derive(Debug, Clone)]
pub struct CategoryFixture {
    pub category: NewCategory,
    pub products: Vec<ProductFixture>,
}

/// A product without its category id, which is only known once the
/// category has been stored.
#[derive(Debug, Clone)]
pub struct ProductFixture {
    pub name: &'static str,
    pub description: &'static str,
    /// Price in cents.
    pub price_cents: i64,
    pub image: &'static str,
    pub size_stock: &'static [(&'static str, u32)],
}

impl ProductFixture {
    /// Build the store input for this product under the given category.
    #[must_use]
    pub fn into_new_product(self, category_id: CategoryId) -> NewProduct {
        let image = self.image.to_string();
        NewProduct {
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: Price::new(Decimal::new(self.price_cents, 2)).unwrap_or_default(),
            images: vec![image.clone()],
            image,
            videos: Vec::new(),
            category_id,
            size_stock: self
                .size_stock
                .iter()
                .map(|(size, stock)| SizeStock::new(*size, *stock))
                .collect(),
        }
    }
}

const APPAREL_SOLD_OUT: &[(&str, u32)] = &[("S", 0), ("M", 0), ("L", 0)];
const ONE_SIZE_SOLD_OUT: &[(&str, u32)] = &[("One Size", 0)];

fn category(name: &str, description: &str, image: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        description: description.to_string(),
        image: image.to_string(),
    }
}

/// The fixture catalog, in insertion order.
#[must_use]
pub fn catalog() -> Vec<CategoryFixture> {
    vec![
        CategoryFixture {
            category: category(
                "Byndis",
                "Premium athletic wear and sports equipment",
                "https://images.unsplash.com/photo-1515955656352-a1fa3ffcd111",
            ),
            products: vec![
                ProductFixture {
                    name: "Running Shoes Pro",
                    description: "Professional grade running shoes",
                    price_cents: 12999,
                    image: "https://images.unsplash.com/photo-1515955656352-a1fa3ffcd111",
                    size_stock: &[("40", 20), ("41", 25), ("42", 0), ("43", 30)],
                },
                ProductFixture {
                    name: "Training Jacket",
                    description: "Lightweight training jacket",
                    price_cents: 8999,
                    image: "https://images.unsplash.com/photo-1591047139829-d91aecb6caea",
                    size_stock: APPAREL_SOLD_OUT,
                },
                ProductFixture {
                    name: "Sports Bag",
                    description: "Durable sports bag",
                    price_cents: 5999,
                    image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62",
                    size_stock: &[("One Size", 100)],
                },
                ProductFixture {
                    name: "Performance Shorts",
                    description: "High-performance shorts",
                    price_cents: 4599,
                    image: "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f",
                    size_stock: APPAREL_SOLD_OUT,
                },
            ],
        },
        CategoryFixture {
            category: category(
                "Sqhat",
                "Innovative fashion and lifestyle products",
                "https://images.unsplash.com/photo-1542291026-7eec264c27ff",
            ),
            products: vec![
                ProductFixture {
                    name: "Fashion Sneakers",
                    description: "Trendy and comfortable sneakers",
                    price_cents: 8999,
                    image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff",
                    size_stock: &[("40", 50), ("41", 50), ("42", 50)],
                },
                ProductFixture {
                    name: "Designer Hoodie",
                    description: "Limited edition hoodie",
                    price_cents: 12000,
                    image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7",
                    size_stock: APPAREL_SOLD_OUT,
                },
                ProductFixture {
                    name: "Urban Backpack",
                    description: "Stylish urban backpack",
                    price_cents: 7999,
                    image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62",
                    size_stock: &[("One Size", 85)],
                },
                ProductFixture {
                    name: "Graphic T-Shirt",
                    description: "Artist collaboration t-shirt",
                    price_cents: 3999,
                    image: "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a",
                    size_stock: &[("S", 0), ("M", 120), ("L", 80)],
                },
            ],
        },
        CategoryFixture {
            category: category(
                "Uasty",
                "High-end electronics and accessories",
                "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
            ),
            products: vec![
                ProductFixture {
                    name: "Wireless Headphones",
                    description: "High-quality wireless headphones",
                    price_cents: 14999,
                    image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
                    size_stock: &[("One Size", 100)],
                },
                ProductFixture {
                    name: "Smart Speaker",
                    description: "Voice-controlled speaker",
                    price_cents: 19999,
                    image: "https://images.unsplash.com/photo-1589492477829-5e65395b66cc",
                    size_stock: ONE_SIZE_SOLD_OUT,
                },
                ProductFixture {
                    name: "Fitness Tracker",
                    description: "Advanced fitness tracking",
                    price_cents: 7999,
                    image: "https://images.unsplash.com/photo-1557438159-51eec7a6c9e8",
                    size_stock: &[("S", 70), ("L", 80)],
                },
                ProductFixture {
                    name: "Wireless Earbuds",
                    description: "Premium wireless earbuds",
                    price_cents: 12999,
                    image: "https://images.unsplash.com/photo-1574920162043-b872873f19c8",
                    size_stock: ONE_SIZE_SOLD_OUT,
                },
            ],
        },
        CategoryFixture {
            category: category(
                "Sonrobin",
                "Luxury watches and jewelry",
                "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
            ),
            products: vec![
                ProductFixture {
                    name: "Premium Watch",
                    description: "Elegant timepiece",
                    price_cents: 19999,
                    image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
                    size_stock: &[("One Size", 50)],
                },
                ProductFixture {
                    name: "Gold Bracelet",
                    description: "18k gold bracelet",
                    price_cents: 29999,
                    image: "https://images.unsplash.com/photo-1573408301185-9146fe634ad0",
                    size_stock: &[("16cm", 0), ("18cm", 0)],
                },
                ProductFixture {
                    name: "Silver Necklace",
                    description: "Sterling silver necklace",
                    price_cents: 15999,
                    image: "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338",
                    size_stock: &[("45cm", 75)],
                },
                ProductFixture {
                    name: "Diamond Ring",
                    description: "Classic diamond ring",
                    price_cents: 49999,
                    image: "https://images.unsplash.com/photo-1605100804763-247f67b3557e",
                    size_stock: &[("6", 0), ("7", 0), ("8", 0)],
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_products() {
        for fixture in catalog() {
            assert!(!fixture.products.is_empty(), "{}", fixture.category.name);
        }
    }

    #[test]
    fn test_fixture_prices_keep_cents() {
        let fixture = catalog()
            .into_iter()
            .next()
            .and_then(|c| c.products.into_iter().next())
            .map(|p| p.into_new_product(CategoryId::new(1)));
        let price = fixture.map(|p| p.price.to_string());
        assert_eq!(price.as_deref(), Some("129.99"));
    }

    #[test]
    fn test_fixture_mixes_stock_states() {
        let products: Vec<NewProduct> = catalog()
            .into_iter()
            .flat_map(|c| c.products)
            .map(|p| p.into_new_product(CategoryId::new(1)))
            .collect();

        let sold_out = |p: &NewProduct| !p.size_stock.iter().any(SizeStock::in_stock);
        let partial = |p: &NewProduct| {
            p.size_stock.iter().any(SizeStock::in_stock)
                && p.size_stock.iter().any(|s| !s.in_stock())
        };

        assert!(products.iter().any(sold_out));
        assert!(products.iter().any(partial));
        assert!(products.iter().any(|p| !sold_out(p) && !partial(p)));
    }
}
