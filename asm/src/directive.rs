use strum::{Display, EnumString};

/// Assembler directives. `*_e` forms act on external (program) memory,
/// `*_i` forms on the 256-byte internal memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Directive {
    Equ,
    OrgE,
    OrgI,
    ResI,
    ResE,
    DwE,
}

impl Directive {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directives() {
        assert_eq!(Directive::parse("equ"), Some(Directive::Equ));
        assert_eq!(Directive::parse("org_e"), Some(Directive::OrgE));
        assert_eq!(Directive::parse("dw_e"), Some(Directive::DwE));
        assert_eq!(Directive::parse("org"), None);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Directive::ResI.to_string(), "res_i");
        assert_eq!(Directive::OrgE.to_string(), "org_e");
    }
}
