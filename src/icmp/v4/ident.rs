use rand::Rng;

type EchoIdentInnerType = u16;

/// Identifier carried by every echo request of one host. Together with the
/// sequence number it is the only wire-level handle for matching a reply to
/// its request.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct EchoIdent(EchoIdentInnerType);

impl EchoIdent {
    pub(crate) fn random() -> EchoIdent {
        EchoIdent(rand::thread_rng().gen::<EchoIdentInnerType>())
    }
}

impl From<EchoIdent> for EchoIdentInnerType {
    fn from(value: EchoIdent) -> Self {
        value.0
    }
}

impl From<EchoIdentInnerType> for EchoIdent {
    fn from(value: EchoIdentInnerType) -> Self {
        EchoIdent(value)
    }
}

impl std::fmt::Display for EchoIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_round_trip() {
        let ident = EchoIdent::from(0xABCD_u16);
        assert_eq!(0xABCD_u16, u16::from(ident));
    }

    #[test]
    fn fmt() {
        assert_eq!("7", format!("{}", EchoIdent::from(7)));
    }
}
