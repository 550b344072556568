use std::sync::Arc;

use sqlx::PgPool;

use farmgate_auth::Hs256JwtCodec;
use farmgate_infra::stores::{
    ActivityStore, FarmStore, PartyStore, ProductStore, ProductionStore, SaleStore, SupplyStore,
    UserStore,
};

/// All stores plus the token codec, shared across handlers.
pub struct AppServices {
    pub farms: FarmStore,
    pub parties: PartyStore,
    pub products: ProductStore,
    pub supplies: SupplyStore,
    pub productions: ProductionStore,
    pub activities: ActivityStore,
    pub sales: SaleStore,
    pub users: UserStore,
    pub jwt: Arc<Hs256JwtCodec>,
}

pub fn build_services(pool: PgPool, jwt_secret: &str) -> AppServices {
    AppServices {
        farms: FarmStore::new(pool.clone()),
        parties: PartyStore::new(pool.clone()),
        products: ProductStore::new(pool.clone()),
        supplies: SupplyStore::new(pool.clone()),
        productions: ProductionStore::new(pool.clone()),
        activities: ActivityStore::new(pool.clone()),
        sales: SaleStore::new(pool.clone()),
        users: UserStore::new(pool),
        jwt: Arc::new(Hs256JwtCodec::new(jwt_secret)),
    }
}
