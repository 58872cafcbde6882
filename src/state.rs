use rust_decimal::Decimal;

use crate::db::OrmConn;

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub tax_rate: Decimal,
}

impl AppState {
    pub fn new(orm: OrmConn, tax_rate: Decimal) -> Self {
        Self { orm, tax_rate }
    }
}
