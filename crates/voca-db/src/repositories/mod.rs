// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod group;
pub mod preference;
pub mod test_result;
pub mod token;
pub mod user;
pub mod word;
