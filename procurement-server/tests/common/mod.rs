//! Shared fixtures: a database seeded with one user, supplier, product and contract

#![allow(dead_code)]

use procurement_server::db::repository::{item, order, reference};
use procurement_server::{Config, DbService, ProcurementState};
use shared::models::{OrderDraft, OrderItemDraft, SupplierGroupDraft, TransitionRequest};
use shared::order::OrderStatus;
use tempfile::TempDir;

pub struct Fixture {
    pub state: ProcurementState,
    pub user_id: i64,
    pub supplier_id: i64,
    pub product_id: i64,
    pub contract_id: i64,
    /// Keeps a file-backed database alive for the test
    _dir: Option<TempDir>,
}

/// In-memory database (one connection)
pub async fn setup() -> Fixture {
    seed(DbService::in_memory().await.unwrap(), None).await
}

/// WAL database file with a multi-connection pool, as the server runs it
pub async fn setup_file() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("procurement.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    seed(db, Some(dir)).await
}

async fn seed(db: DbService, dir: Option<TempDir>) -> Fixture {
    let pool = db.pool.clone();

    let user_id = reference::create_user(&pool, "Nutricionista").await.unwrap();
    let supplier_id = reference::create_supplier(&pool, "Hortifruti Vale").await.unwrap();
    let product_id = reference::create_product(&pool, "Arroz 5kg").await.unwrap();
    let contract_id = reference::create_contract(&pool, supplier_id, "CT-2024-001", true)
        .await
        .unwrap();

    Fixture {
        state: ProcurementState::with_db(Config::default(), db),
        user_id,
        supplier_id,
        product_id,
        contract_id,
        _dir: dir,
    }
}

impl Fixture {
    pub fn line(&self, quantity: f64, unit_price: f64) -> OrderItemDraft {
        OrderItemDraft {
            product_id: self.product_id,
            contract_id: Some(self.contract_id),
            quantity,
            unit_price,
        }
    }

    /// Order with a single supplier group holding the given lines; returns (order id, item ids)
    pub async fn order_with_lines(&self, number: &str, lines: Vec<OrderItemDraft>) -> (i64, Vec<i64>) {
        let order_id = order::create_with_items(
            &self.state.pool,
            OrderDraft {
                order_number: number.into(),
                user_id: Some(self.user_id),
                notes: None,
                groups: vec![SupplierGroupDraft {
                    supplier_id: self.supplier_id,
                    items: lines,
                }],
            },
        )
        .await
        .unwrap();

        let items = item::find_by_order(&self.state.pool, order_id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        (order_id, items)
    }

    /// The reference order: one item, 10 × 2.00
    pub async fn simple_order(&self, number: &str) -> (i64, i64) {
        let (order_id, items) = self.order_with_lines(number, vec![self.line(10.0, 2.0)]).await;
        (order_id, items[0])
    }

    pub async fn status(&self, order_id: i64) -> String {
        order::find_status(&self.state.pool, order_id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn transition(&self, order_id: i64, target: OrderStatus) {
        self.state
            .state_machine
            .request_transition(request(order_id, target, None))
            .await
            .unwrap();
    }
}

pub fn request(order_id: i64, target: OrderStatus, note: Option<&str>) -> TransitionRequest {
    TransitionRequest {
        order_id,
        target,
        note: note.map(str::to_string),
        actor: Some("tester".into()),
    }
}
