use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account known by display name. `id` is `None` for accounts discovered
/// during an import that do not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<AccountId>,
    pub name: String,
}

impl Account {
    pub fn new(name: &str) -> Self {
        Account {
            id: None,
            name: name.to_string(),
        }
    }

    pub fn existing(id: AccountId, name: &str) -> Self {
        Account {
            id: Some(id),
            name: name.to_string(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    pub transaction_type: TransactionType,
}

impl Category {
    pub fn new(name: &str, transaction_type: TransactionType) -> Self {
        Category {
            id: None,
            name: name.to_string(),
            transaction_type,
        }
    }

    pub fn existing(id: CategoryId, name: &str, transaction_type: TransactionType) -> Self {
        Category {
            id: Some(id),
            name: name.to_string(),
            transaction_type,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_no_id() {
        let a = Account::new("Alipay");
        assert!(a.is_new());
        assert_eq!(a.name, "Alipay");
    }

    #[test]
    fn existing_account_keeps_id() {
        let a = Account::existing(AccountId(7), "Bank Card");
        assert!(!a.is_new());
        assert_eq!(a.id.unwrap().to_string(), "7");
    }

    #[test]
    fn category_constructors() {
        let c = Category::new("Food", TransactionType::Expense);
        assert!(c.is_new());
        let c = Category::existing(CategoryId(3), "Salary", TransactionType::Income);
        assert_eq!(c.id, Some(CategoryId(3)));
        assert_eq!(c.transaction_type, TransactionType::Income);
    }
}
