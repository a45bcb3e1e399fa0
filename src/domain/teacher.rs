/// A persisted teacher row. Only the shape exists for now; no handlers
/// operate on teachers yet.
#[derive(Clone, Debug)]
pub struct Teacher {
    pub id: i64,
    pub lastname: String,
    pub firstname: String,
}
