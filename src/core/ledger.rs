use super::cca::SCHEDULE_YEARS;
use super::records::{
    AssetDraft, CapitalAsset, ExpenseCategory, ExpenseDraft, ExpenseRecord, ValidationError,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// In-memory expenses and capital assets, kept in insertion order
#[derive(Debug, Default)]
pub struct Ledger {
    expenses: Vec<ExpenseRecord>,
    assets: Vec<CapitalAsset>,
    next_expense: usize,
    next_asset: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn assets(&self) -> &[CapitalAsset] {
        &self.assets
    }

    pub fn expense(&self, id: &str) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn asset(&self, id: &str) -> Option<&CapitalAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn add_expense(
        &mut self,
        draft: &ExpenseDraft,
        tax_rate: Decimal,
    ) -> Result<&ExpenseRecord, LedgerError> {
        let id = match &draft.id {
            Some(id) => id.clone(),
            None => {
                let expenses = &self.expenses;
                next_id("exp", &mut self.next_expense, |id| expenses.iter().any(|e| e.id == id))
            }
        };
        if self.expense(&id).is_some() {
            return Err(LedgerError::DuplicateId { kind: "expense", id });
        }

        let record = ExpenseRecord::from_draft(draft, id, tax_rate)?;
        log::debug!(
            "Added expense {}: {} {} gross={}",
            record.id,
            record.date,
            record.category,
            record.gross_amount
        );
        self.expenses.push(record);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Replace an expense wholesale, keeping its position
    pub fn update_expense(
        &mut self,
        id: &str,
        changes: &ExpenseDraft,
        tax_rate: Decimal,
    ) -> Result<&ExpenseRecord, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "expense",
                id: id.to_string(),
            })?;
        let updated = self.expenses[index].edited(changes, tax_rate)?;
        log::debug!("Updated expense {}", id);
        self.expenses[index] = updated;
        Ok(&self.expenses[index])
    }

    pub fn delete_expense(&mut self, id: &str) -> Result<ExpenseRecord, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "expense",
                id: id.to_string(),
            })?;
        log::debug!("Deleted expense {}", id);
        Ok(self.expenses.remove(index))
    }

    pub fn add_asset(&mut self, draft: &AssetDraft) -> Result<&CapitalAsset, LedgerError> {
        let id = match &draft.id {
            Some(id) => id.clone(),
            None => {
                let assets = &self.assets;
                next_id("ast", &mut self.next_asset, |id| assets.iter().any(|a| a.id == id))
            }
        };
        if self.asset(&id).is_some() {
            return Err(LedgerError::DuplicateId { kind: "asset", id });
        }

        let asset = CapitalAsset::from_draft(draft, id)?;
        log::debug!(
            "Added asset {}: {} fmv={} rate={}%",
            asset.id,
            asset.name,
            asset.fair_market_value,
            asset.depreciation_rate_percent
        );
        self.assets.push(asset);
        Ok(&self.assets[self.assets.len() - 1])
    }

    pub fn update_asset(
        &mut self,
        id: &str,
        changes: &AssetDraft,
    ) -> Result<&CapitalAsset, LedgerError> {
        let index = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "asset",
                id: id.to_string(),
            })?;
        let updated = self.assets[index].edited(changes)?;
        log::debug!("Updated asset {}", id);
        self.assets[index] = updated;
        Ok(&self.assets[index])
    }

    pub fn delete_asset(&mut self, id: &str) -> Result<CapitalAsset, LedgerError> {
        let index = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: "asset",
                id: id.to_string(),
            })?;
        log::debug!("Deleted asset {}", id);
        Ok(self.assets.remove(index))
    }

    /// Totals across all stored records
    pub fn summary(&self) -> LedgerSummary {
        let mut summary = LedgerSummary {
            expense_count: self.expenses.len(),
            asset_count: self.assets.len(),
            ..Default::default()
        };

        for expense in &self.expenses {
            summary.total_gross += expense.gross_amount;
            summary.total_tax += expense.breakdown.tax_amount;
            summary.total_before_tax += expense.breakdown.amount_before_tax;
            summary.total_deductible += expense.breakdown.deductible_amount;
            summary.total_itc += expense.breakdown.itc_claimable;

            let category = summary
                .by_category
                .entry(expense.category)
                .or_default();
            category.count += 1;
            category.gross += expense.gross_amount;
            category.deductible += expense.breakdown.deductible_amount;
            category.itc += expense.breakdown.itc_claimable;
        }

        summary.cca_by_year = (1..=SCHEDULE_YEARS)
            .map(|year| {
                self.assets
                    .iter()
                    .map(|a| a.depreciation_for_year(year))
                    .sum::<Decimal>()
            })
            .collect();

        summary
    }
}

/// Next `{prefix}-N` id from `counter` that `taken` does not reject
fn next_id(prefix: &str, counter: &mut usize, taken: impl Fn(&str) -> bool) -> String {
    loop {
        *counter += 1;
        let id = format!("{}-{}", prefix, counter);
        if !taken(&id) {
            return id;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub count: usize,
    pub gross: Decimal,
    pub deductible: Decimal,
    pub itc: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSummary {
    pub expense_count: usize,
    pub asset_count: usize,
    pub total_gross: Decimal,
    pub total_tax: Decimal,
    pub total_before_tax: Decimal,
    pub total_deductible: Decimal,
    pub total_itc: Decimal,
    pub by_category: BTreeMap<ExpenseCategory, CategoryTotals>,
    /// Combined CCA for year 1..=5 across all assets
    pub cca_by_year: Vec<Decimal>,
}

impl LedgerSummary {
    pub fn first_year_cca(&self) -> Decimal {
        self.cca_by_year.first().copied().unwrap_or(Decimal::ZERO)
    }

    /// Deductible expenses plus first-year CCA
    pub fn total_first_year_deductions(&self) -> Decimal {
        self.total_deductible + self.first_year_cca()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::CcaClass;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HST: Decimal = dec!(0.13);

    fn expense(description: &str, category: ExpenseCategory, amount: Decimal) -> ExpenseDraft {
        ExpenseDraft {
            id: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            category: Some(category),
            description: Some(description.to_string()),
            amount: Some(amount),
            business_use_percent: None,
        }
    }

    fn asset(name: &str, fmv: Decimal, class: CcaClass) -> AssetDraft {
        AssetDraft {
            name: Some(name.to_string()),
            cca_class: Some(class),
            fair_market_value: Some(fmv),
            ..Default::default()
        }
    }

    #[test]
    fn insertion_order_preserved() {
        let mut ledger = Ledger::new();
        ledger.add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST).unwrap();
        ledger
            .add_expense(&expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50)), HST)
            .unwrap();
        ledger.add_expense(&expense("Train", ExpenseCategory::Travel, dec!(56.50)), HST).unwrap();

        let names: Vec<_> = ledger.expenses().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Adobe", "Chair", "Train"]);
        let ids: Vec<_> = ledger.expenses().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["exp-1", "exp-2", "exp-3"]);
    }

    #[test]
    fn invalid_draft_is_not_added() {
        let mut ledger = Ledger::new();
        let mut draft = expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50));
        draft.category = None;
        let err = ledger.add_expense(&draft, HST).unwrap_err();
        assert_eq!(err, LedgerError::Invalid(ValidationError::MissingField("category")));
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut ledger = Ledger::new();
        let mut draft = expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50));
        draft.id = Some("a".to_string());
        ledger.add_expense(&draft, HST).unwrap();
        assert_eq!(
            ledger.add_expense(&draft, HST).unwrap_err(),
            LedgerError::DuplicateId {
                kind: "expense",
                id: "a".to_string()
            }
        );
    }

    #[test]
    fn generated_ids_skip_explicit_ones() {
        let mut ledger = Ledger::new();
        let mut draft = expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50));
        draft.id = Some("exp-1".to_string());
        ledger.add_expense(&draft, HST).unwrap();
        let added = ledger
            .add_expense(&expense("Desk", ExpenseCategory::HomeOffice, dec!(113)), HST)
            .unwrap();
        assert_eq!(added.id, "exp-2");
    }

    #[test]
    fn expense_and_asset_ids_count_separately() {
        let mut ledger = Ledger::new();
        let mut draft = asset("Laptop", dec!(2000), CcaClass::Class50);
        draft.id = Some("ast-1".to_string());
        ledger.add_asset(&draft).unwrap();
        ledger
            .add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST)
            .unwrap();
        ledger.add_asset(&asset("Desk", dec!(500), CcaClass::Class8)).unwrap();
        ledger
            .add_expense(&expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50)), HST)
            .unwrap();

        let expense_ids: Vec<_> = ledger.expenses().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(expense_ids, vec!["exp-1", "exp-2"]);
        let asset_ids: Vec<_> = ledger.assets().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(asset_ids, vec!["ast-1", "ast-2"]);
    }

    #[test]
    fn update_keeps_position() {
        let mut ledger = Ledger::new();
        ledger.add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST).unwrap();
        ledger
            .add_expense(&expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50)), HST)
            .unwrap();

        let changes = ExpenseDraft {
            amount: Some(dec!(113)),
            ..Default::default()
        };
        let updated = ledger.update_expense("exp-1", &changes, HST).unwrap();
        assert_eq!(updated.breakdown.tax_amount, dec!(13.00));
        assert_eq!(ledger.expenses()[0].id, "exp-1");
        assert_eq!(ledger.expenses()[0].gross_amount, dec!(113));
        assert_eq!(ledger.expenses()[0].description, "Adobe");
    }

    #[test]
    fn failed_update_leaves_record() {
        let mut ledger = Ledger::new();
        ledger.add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST).unwrap();
        let changes = ExpenseDraft {
            amount: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(ledger.update_expense("exp-1", &changes, HST).is_err());
        assert_eq!(ledger.expenses()[0].gross_amount, dec!(67.79));
    }

    #[test]
    fn delete_by_id() {
        let mut ledger = Ledger::new();
        ledger.add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST).unwrap();
        ledger
            .add_expense(&expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50)), HST)
            .unwrap();

        let removed = ledger.delete_expense("exp-1").unwrap();
        assert_eq!(removed.description, "Adobe");
        assert_eq!(ledger.expenses().len(), 1);
        assert_eq!(
            ledger.delete_expense("exp-1").unwrap_err(),
            LedgerError::NotFound {
                kind: "expense",
                id: "exp-1".to_string()
            }
        );
    }

    #[test]
    fn asset_crud() {
        let mut ledger = Ledger::new();
        ledger.add_asset(&asset("Laptop", dec!(2000), CcaClass::Class50)).unwrap();
        ledger.add_asset(&asset("Desk", dec!(500), CcaClass::Class8)).unwrap();
        assert_eq!(ledger.asset("ast-2").unwrap().name, "Desk");

        let changes = AssetDraft {
            business_use_percent: Some(dec!(50)),
            ..Default::default()
        };
        let updated = ledger.update_asset("ast-1", &changes).unwrap();
        assert_eq!(updated.depreciation_for_year(1), dec!(275.00));

        ledger.delete_asset("ast-1").unwrap();
        assert_eq!(ledger.assets().len(), 1);
        assert!(ledger.update_asset("ast-1", &changes).is_err());
    }

    #[test]
    fn summary_totals() {
        let mut ledger = Ledger::new();
        ledger.add_expense(&expense("Adobe", ExpenseCategory::Software, dec!(67.79)), HST).unwrap();
        ledger
            .add_expense(&expense("Chair", ExpenseCategory::HomeOffice, dec!(282.50)), HST)
            .unwrap();
        let mut meal = expense("Client lunch", ExpenseCategory::Meals, dec!(113));
        meal.business_use_percent = Some(dec!(50));
        ledger.add_expense(&meal, HST).unwrap();
        ledger.add_asset(&asset("Laptop", dec!(2000), CcaClass::Class50)).unwrap();
        ledger.add_asset(&asset("Desk", dec!(500), CcaClass::Class8)).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.total_gross, dec!(463.29));
        assert_eq!(summary.total_tax, dec!(53.30));
        assert_eq!(summary.total_before_tax, dec!(409.99));
        assert_eq!(summary.total_deductible, dec!(359.99));
        assert_eq!(summary.total_itc, dec!(46.80));
        assert_eq!(summary.by_category[&ExpenseCategory::Meals].deductible, dec!(50.00));
        assert_eq!(summary.by_category[&ExpenseCategory::Software].count, 1);
        // 550 (laptop) + 50 (desk)
        assert_eq!(summary.first_year_cca(), dec!(600.00));
        assert_eq!(summary.cca_by_year.len(), 5);
        assert_eq!(summary.total_first_year_deductions(), dec!(959.99));
    }

    #[test]
    fn empty_summary() {
        let summary = Ledger::new().summary();
        assert_eq!(summary.total_gross, Decimal::ZERO);
        assert_eq!(summary.first_year_cca(), Decimal::ZERO);
        assert_eq!(summary.cca_by_year, vec![Decimal::ZERO; 5]);
    }
}
