/// The named collections this service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Parcels,
    Coverage,
    Books,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Parcels,
        Collection::Coverage,
        Collection::Books,
    ];

    /// Name of the backing collection in the document store.
    ///
    /// Coverage entries live in the `warehouses` collection.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Parcels => "parcels",
            Collection::Coverage => "warehouses",
            Collection::Books => "books",
        }
    }
}
