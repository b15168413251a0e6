use bevy::prelude::*;

/// The player's money. Never goes negative.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: u32,
}

impl Wallet {
    pub fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// Deduct `amount` if the wallet holds enough; otherwise leave it untouched.
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.balance < amount {
            debug!("[Economy] Cannot spend {}g, only {}g held", amount, self.balance);
            return false;
        }
        self.balance -= amount;
        true
    }

    pub fn add(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}

/// Format a gold amount as a display string (e.g. "1,234g").
pub fn format_gold(amount: u32) -> String {
    let s = amount.to_string();
    let mut result = String::new();
    let digits: Vec<char> = s.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push('g');
    result
}
