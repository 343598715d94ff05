//! Products offered by the simulated shop

pub struct Product {
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
}

pub const PRODUCTS: [Product; 6] = [
    Product {
        name: "Sauce Labs Backpack",
        description: "carry.allTheThings() with the sleek, streamlined Sly Pack.",
        price: 29.99,
    },
    Product {
        name: "Sauce Labs Bike Light",
        description: "A red light isn't the desired state in testing but it sure helps when riding your bike at night.",
        price: 9.99,
    },
    Product {
        name: "Sauce Labs Bolt T-Shirt",
        description: "Get your testing superhero on with the Sauce Labs bolt T-shirt.",
        price: 15.99,
    },
    Product {
        name: "Sauce Labs Fleece Jacket",
        description: "It's not every day that you come across a midweight quarter-zip fleece jacket.",
        price: 49.99,
    },
    Product {
        name: "Sauce Labs Onesie",
        description: "Rib snap infant onesie for the junior automation engineer in development.",
        price: 7.99,
    },
    Product {
        name: "Test.allTheThings() T-Shirt (Red)",
        description: "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard.",
        price: 15.99,
    },
];

/// Sales tax applied at checkout
pub const TAX_RATE: f64 = 0.08;

/// Products whose add button does nothing for the problem persona
pub const PROBLEM_USER_UNADDABLE: [usize; 3] = [2, 3, 5];

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
