pub mod slab_list;

pub mod prelude {
    pub use crate::slab_list::{SlabList, SlotId};
}
