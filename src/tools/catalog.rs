use serde_json::Value;
use tracing::warn;

use super::{ParamKind, Tool, ToolDescriptor, ToolFuture, ToolOutput, require_string};

// A `None` price is listed but unpriced.
const PRODUCTS: [(&str, Option<u32>); 6] = [
    ("Redmi Note 10S 8GB/128GB", Some(1700)),
    ("iPhone 15", Some(1200)),
    ("Samsung S24", Some(1100)),
    ("MacBook Air", Some(1500)),
    ("AirPods Pro", Some(250)),
    ("Watch", None),
];

const STOCKS: [(&str, f64); 4] = [
    ("AAPL", 185.30),
    ("GOOGL", 138.50),
    ("MSFT", 402.20),
    ("TSLA", 210.10),
];

pub fn product_price(product_name: &str) -> String {
    let price = PRODUCTS
        .iter()
        .find(|(name, _)| *name == product_name)
        .and_then(|(_, price)| *price);

    match price {
        Some(price) => format!("The price of {product_name} is ${price}."),
        None => {
            warn!(product_name = %product_name, "product price not found");
            format!("Price for '{product_name}' not found.")
        }
    }
}

pub fn stock_price(ticker: &str) -> String {
    match STOCKS.iter().find(|(symbol, _)| *symbol == ticker) {
        Some((_, price)) => format!("The current stock price of {ticker} is ${price:.2}."),
        None => {
            warn!(ticker = %ticker, "stock price not found");
            format!("Stock price for '{ticker}' not found.")
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductPriceTool;

impl Tool for ProductPriceTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_product_price",
            "Get the price of a product from a predefined catalog.",
        )
        .required(
            "product_name",
            ParamKind::String,
            "Name of the product to get the price for.",
        )
    }

    fn invoke<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a> {
        Box::pin(async move {
            let product_name = require_string(arguments, "product_name")?;
            Ok(ToolOutput::new(product_price(product_name)))
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StockPriceTool;

impl Tool for StockPriceTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "get_stock_price",
            "Get the current stock price for a given ticker symbol.",
        )
        .required(
            "ticker",
            ParamKind::String,
            "Ticker symbol of the stock to get the price for.",
        )
    }

    fn invoke<'a>(&'a self, arguments: &'a Value) -> ToolFuture<'a> {
        Box::pin(async move {
            let ticker = require_string(arguments, "ticker")?;
            Ok(ToolOutput::new(stock_price(ticker)))
        })
    }
}
