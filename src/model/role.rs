use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Ceo,
    Hr,
    Employee,
}

impl Role {
    /// CEO and HR manage company configuration.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Ceo | Role::Hr)
    }
}
