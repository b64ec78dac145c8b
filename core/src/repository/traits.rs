use crate::model::store::AttendanceStore;
use anyhow::Result;

pub trait StoreRepository {
    fn load(&self) -> Result<AttendanceStore>;
    fn save(&self, store: &AttendanceStore) -> Result<()>;
}
