mod family_group;
mod group_code;

pub use family_group::{FamilyGroup, NewFamilyGroup};
pub use group_code::{GroupCode, InvalidGroupCode, CODE_MAX, CODE_MIN, CODE_WIDTH};
