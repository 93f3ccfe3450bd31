use uuid::Uuid;

/// Records addressed by a `Uuid` inside the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Records whose name must be unique among their siblings.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Short label for lists and log lines.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Finds the record with the given identifier in a slice.
pub(crate) fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

pub(crate) fn find_by_id_mut<T: Identifiable>(items: &mut [T], id: Uuid) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Case-insensitive, whitespace-trimmed name comparison used for uniqueness checks.
pub(crate) fn same_name(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// Whether `candidate` collides with the name of any item other than `exclude`.
pub(crate) fn name_taken<T>(items: &[T], candidate: &str, exclude: Option<Uuid>) -> bool
where
    T: Identifiable + NamedEntity,
{
    items
        .iter()
        .any(|item| same_name(item.name(), candidate) && exclude.map_or(true, |id| item.id() != id))
}
