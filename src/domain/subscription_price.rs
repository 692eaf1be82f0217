#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionPrice(i32);

impl SubscriptionPrice {
    pub fn parse(price: i32) -> Result<SubscriptionPrice, String> {
        if price <= 0 {
            return Err(format!("{} is not a valid price, it must be positive", price));
        }

        Ok(Self(price))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}
