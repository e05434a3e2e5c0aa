#[cfg(test)]
mod tests {
    use crate::errors::{DatabaseError, ErrorKind, Result};
    use crate::recurring::*;
    use crate::transactions::{LedgerRepositoryTrait, LedgerTransaction};
    use crate::{Error, YearMonth};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock repository backing definitions and the ledger ---
    #[derive(Default)]
    struct MockRecurringRepository {
        expenses: Mutex<Vec<RecurringExpense>>,
        ledger: Mutex<Vec<LedgerTransaction>>,
    }

    impl MockRecurringRepository {
        fn not_found(expense_id: &str) -> Error {
            DatabaseError::NotFound(format!("Recurring expense {}", expense_id)).into()
        }
    }

    #[async_trait]
    impl RecurringExpenseRepositoryTrait for MockRecurringRepository {
        fn get_by_id(&self, owner_id: &str, expense_id: &str) -> Result<RecurringExpense> {
            self.expenses
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == expense_id && e.owner_id == owner_id)
                .cloned()
                .ok_or_else(|| Self::not_found(expense_id))
        }

        fn list(&self, owner_id: &str, is_active: Option<bool>) -> Result<Vec<RecurringExpense>> {
            Ok(self
                .expenses
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.owner_id == owner_id)
                .filter(|e| is_active.map_or(true, |active| e.is_active == active))
                .cloned()
                .collect())
        }

        async fn create(&self, new_expense: NewRecurringExpense) -> Result<RecurringExpense> {
            let mut expenses = self.expenses.lock().unwrap();
            let expense = RecurringExpense {
                id: format!("rec-{}", expenses.len() + 1),
                owner_id: new_expense.owner_id,
                description: new_expense.description,
                category: new_expense.category.unwrap_or_default(),
                amount: new_expense.amount,
                day_of_month: new_expense.day_of_month,
                is_active: new_expense.is_active,
                last_generated_period: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            expenses.push(expense.clone());
            Ok(expense)
        }

        async fn update(
            &self,
            owner_id: &str,
            expense_id: &str,
            edit: ExpenseEdit,
        ) -> Result<RecurringExpense> {
            let expense = edit(&self.get_by_id(owner_id, expense_id)?)?;
            let mut expenses = self.expenses.lock().unwrap();
            let stored = expenses
                .iter_mut()
                .find(|e| e.id == expense.id)
                .ok_or_else(|| Self::not_found(&expense.id))?;
            let last_generated_period = stored.last_generated_period;
            *stored = RecurringExpense {
                last_generated_period,
                ..expense
            };
            Ok(stored.clone())
        }

        async fn record_generation(
            &self,
            owner_id: &str,
            expense_id: &str,
            step: GenerationStep,
        ) -> Result<GenerationResult> {
            let generation = step(&self.get_by_id(owner_id, expense_id)?)?;
            let mut expenses = self.expenses.lock().unwrap();
            let stored = expenses
                .iter_mut()
                .find(|e| e.id == generation.expense_id)
                .ok_or_else(|| Self::not_found(&generation.expense_id))?;
            if stored.last_generated_period != generation.expected_last {
                return Err(RecurringError::ConcurrentModification(generation.expense_id).into());
            }
            stored.last_generated_period = Some(generation.next_last);

            let mut ledger = self.ledger.lock().unwrap();
            let t = generation.transaction;
            let transaction = LedgerTransaction {
                id: format!("tx-{}", ledger.len() + 1),
                owner_id: t.owner_id,
                group_id: t.group_id,
                description: t.description,
                category: t.category,
                amount: t.amount,
                occurred_on: t.occurred_on,
                source: t.source,
                is_shared: t.is_shared,
                paid_by_member_id: t.paid_by_member_id,
                idempotency_key: t.idempotency_key,
                created_at: NaiveDateTime::default(),
            };
            ledger.push(transaction.clone());
            Ok(GenerationResult {
                expense: stored.clone(),
                transaction,
            })
        }

        async fn delete(&self, owner_id: &str, expense_id: &str) -> Result<usize> {
            let mut expenses = self.expenses.lock().unwrap();
            let before = expenses.len();
            expenses.retain(|e| !(e.id == expense_id && e.owner_id == owner_id));
            Ok(before - expenses.len())
        }
    }

    impl LedgerRepositoryTrait for MockRecurringRepository {
        fn list_for_plan(&self, _owner_id: &str, _plan_id: &str) -> Result<Vec<LedgerTransaction>> {
            Ok(Vec::new())
        }

        fn list_for_recurring(
            &self,
            owner_id: &str,
            expense_id: &str,
        ) -> Result<Vec<LedgerTransaction>> {
            let prefix = format!("recurring:{}:", expense_id);
            Ok(self
                .ledger
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.owner_id == owner_id && t.idempotency_key.starts_with(&prefix))
                .cloned()
                .collect())
        }

        fn exists_by_key(&self, idempotency_key: &str) -> Result<bool> {
            Ok(self
                .ledger
                .lock()
                .unwrap()
                .iter()
                .any(|t| t.idempotency_key == idempotency_key))
        }
    }

    // --- Helpers ---
    fn setup() -> (Arc<MockRecurringRepository>, RecurringExpenseService) {
        let repository = Arc::new(MockRecurringRepository::default());
        let service = RecurringExpenseService::new(repository.clone(), repository.clone());
        (repository, service)
    }

    async fn create(service: &RecurringExpenseService, description: &str) -> RecurringExpense {
        service
            .create_expense(NewRecurringExpense {
                owner_id: "owner-1".to_string(),
                description: description.to_string(),
                category: Some("HOUSING".to_string()),
                amount: dec!(950),
                day_of_month: 31,
                is_active: true,
            })
            .await
            .unwrap()
    }

    // --- Tests ---
    #[tokio::test]
    async fn test_generate_twice_yields_one_transaction() {
        let (repository, service) = setup();
        let rent = create(&service, "Rent").await;

        let first = service.generate("owner-1", &rent.id, 3, 2024).await.unwrap();
        assert_eq!(
            first.transaction.occurred_on,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert_eq!(
            first.expense.last_generated_period,
            Some(YearMonth::new(2024, 3).unwrap())
        );

        let err = service.generate("owner-1", &rent.id, 3, 2024).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Recurring(RecurringError::AlreadyGenerated { .. })
        ));
        assert_eq!(repository.ledger.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backfilled_month_is_idempotent_too() {
        let (repository, service) = setup();
        let rent = create(&service, "Rent").await;

        service.generate("owner-1", &rent.id, 2, 2024).await.unwrap();
        let march = service.generate("owner-1", &rent.id, 3, 2024).await.unwrap();
        assert_eq!(march.expense.last_generated_period, Some(YearMonth::new(2024, 3).unwrap()));

        // February is no longer the last period, the ledger key still catches it
        let err = service.generate("owner-1", &rent.id, 2, 2024).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Recurring(RecurringError::AlreadyGenerated { .. })
        ));

        // Backfilling January keeps March as the latest period
        let january = service.generate("owner-1", &rent.id, 1, 2024).await.unwrap();
        assert_eq!(
            january.expense.last_generated_period,
            Some(YearMonth::new(2024, 3).unwrap())
        );
        assert_eq!(repository.ledger.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_inactive_fails() {
        let (_, service) = setup();
        let rent = create(&service, "Rent").await;
        service.toggle_expense("owner-1", &rent.id, false).await.unwrap();

        let err = service.generate("owner-1", &rent.id, 3, 2024).await.unwrap_err();
        assert!(matches!(err, Error::Recurring(RecurringError::RecurringInactive(_))));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[tokio::test]
    async fn test_generate_validates_period() {
        let (_, service) = setup();
        let rent = create(&service, "Rent").await;

        let err = service.generate("owner-1", &rent.id, 13, 2024).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field_errors()[0].field, "month");
    }

    #[tokio::test]
    async fn test_generate_all_skips_generated_and_inactive() {
        let (_, service) = setup();
        let rent = create(&service, "Rent").await;
        let gym = create(&service, "Gym").await;
        let paused = create(&service, "Streaming").await;
        service.toggle_expense("owner-1", &paused.id, false).await.unwrap();
        service.generate("owner-1", &gym.id, 4, 2024).await.unwrap();

        let batch = service.generate_all("owner-1", 4, 2024).await.unwrap();

        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.transactions[0].description, "Rent");
        assert_eq!(batch.skipped, vec![gym.id.clone()]);
        assert_eq!(
            service.list_expense_transactions("owner-1", &rent.id).unwrap().len(),
            1
        );

        let again = service.generate_all("owner-1", 4, 2024).await.unwrap();
        assert!(again.transactions.is_empty());
        assert_eq!(again.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_does_not_touch_history() {
        let (_, service) = setup();
        let rent = create(&service, "Rent").await;
        service.generate("owner-1", &rent.id, 1, 2024).await.unwrap();

        let paused = service.toggle_expense("owner-1", &rent.id, false).await.unwrap();
        assert!(!paused.is_active);
        assert_eq!(paused.last_generated_period, Some(YearMonth::new(2024, 1).unwrap()));
        assert_eq!(
            service.list_expense_transactions("owner-1", &rent.id).unwrap().len(),
            1
        );
        assert_eq!(service.list_expenses("owner-1", Some(true)).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_foreign_expense_is_not_found() {
        let (_, service) = setup();
        let rent = create(&service, "Rent").await;

        let err = service.generate("intruder", &rent.id, 3, 2024).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = service.delete_expense("intruder", &rent.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(service.get_expense("owner-1", &rent.id).is_ok());
    }
}
