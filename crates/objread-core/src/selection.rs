use tracing::debug;

use crate::descriptor::Descriptor;
use crate::host::Entity;
use crate::readers::Registry;

/// Describe every selected entity, in selection order.
///
/// One descriptor per input entity: duplicates are kept and nothing is
/// filtered. An empty selection yields an empty vector, which callers should
/// treat as "nothing selected" rather than an error.
pub fn read_selection<E, I>(registry: &Registry<E>, selection: I) -> Vec<Descriptor>
where
    E: Entity,
    I: IntoIterator<Item = E>,
{
    let out: Vec<Descriptor> = selection
        .into_iter()
        .map(|entity| registry.read_entity(&entity))
        .collect();
    debug!(
        selected = out.len(),
        described = out.iter().map(Descriptor::tree_len).sum::<usize>(),
        "read selection"
    );
    out
}

impl<E: Entity> Registry<E> {
    pub fn read_selection<I: IntoIterator<Item = E>>(&self, selection: I) -> Vec<Descriptor> {
        read_selection(self, selection)
    }
}
