/// Component selectors parsed from the short strings users type
/// (`comp = "nue"`, `peak = "bounce"`, ...). Anything outside the listed set
/// is rejected with [`Error::ComponentNotRecognized`](crate::Error).
macro_rules! selector {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(crate::error::Error::not_recognized($category, other)),
                }
            }
        }

        impl clap::ValueEnum for $name {
            fn value_variants<'a>() -> &'a [Self] {
                Self::ALL
            }

            fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
                Some(clap::builder::PossibleValue::new(self.as_str()))
            }
        }
    };
}

selector! {
    /// Neutrino flavour, or all three in the order nue, nua, nux.
    Flavour, "neutrino" {
        Nue => "nue",
        Nua => "nua",
        Nux => "nux",
        All => "all",
    }
}

selector! {
    /// Global maximum or minimum.
    Bound, "extremum" {
        Max => "max",
        Min => "min",
    }
}

selector! {
    /// Global maximum, minimum or central value.
    Extremum, "thermodynamic" {
        Max => "max",
        Min => "min",
        Cent => "cent",
    }
}

selector! {
    /// Magnetic energy: total, poloidal, toroidal or one spatial component.
    MagneticComponent, "magnetic energy" {
        Total => "tot",
        Poloidal => "pol",
        Toroidal => "tor",
        R => "r",
        Theta => "th",
        Phi => "ph",
    }
}

selector! {
    /// Kinetic energy: total or one spatial component.
    KineticComponent, "kinetic energy" {
        Total => "tot",
        R => "r",
        Theta => "th",
        Phi => "ph",
    }
}

selector! {
    /// Gravitational-wave polarisation and observer (3D runs).
    GwComponent, "GW" {
        PlusEquator => "h+eq",
        PlusPole => "h+pol",
        CrossEquator => "hxeq",
        CrossPole => "hxpol",
        All => "all",
    }
}

selector! {
    /// Which strain peak `delta_h` measures.
    PeakKind, "peak" {
        Bounce => "bounce",
        Highest => "highest",
    }
}

selector! {
    /// Detector whose design sensitivity `asd` loads.
    Detector, "detector" {
        AdvancedLigo => "aLIGO",
        AdvancedVirgo => "AdV",
        Kagra => "KAGRA",
        EinsteinTelescope => "ET",
        CosmicExplorer => "CE",
    }
}

impl Flavour {
    /// The single flavours this selection covers, in output order.
    pub fn expand(&self) -> &'static [Flavour] {
        match self {
            Flavour::Nue => &[Flavour::Nue],
            Flavour::Nua => &[Flavour::Nua],
            Flavour::Nux => &[Flavour::Nux],
            Flavour::All => &[Flavour::Nue, Flavour::Nua, Flavour::Nux],
        }
    }
}

impl GwComponent {
    /// Position among the four 3D components, `None` for `All`.
    pub fn index(&self) -> Option<usize> {
        match self {
            GwComponent::PlusEquator => Some(0),
            GwComponent::PlusPole => Some(1),
            GwComponent::CrossEquator => Some(2),
            GwComponent::CrossPole => Some(3),
            GwComponent::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_and_prints() {
        assert_eq!("nux".parse::<Flavour>().unwrap(), Flavour::Nux);
        assert_eq!("h+pol".parse::<GwComponent>().unwrap(), GwComponent::PlusPole);
        assert_eq!(Extremum::Cent.to_string(), "cent");
        for m in MagneticComponent::ALL {
            assert_eq!(m.as_str().parse::<MagneticComponent>().unwrap(), *m);
        }
    }

    #[test]
    fn bogus_selectors_are_rejected() {
        let err = "bogus".parse::<Flavour>().unwrap_err();
        assert!(matches!(
            &err,
            Error::ComponentNotRecognized { category: "neutrino", value } if value == "bogus"
        ));
        assert!(err.to_string().contains("component not recognized"));
        assert!("cent".parse::<Bound>().is_err());
        assert!("pol".parse::<KineticComponent>().is_err());
        assert!("h+".parse::<GwComponent>().is_err());
        assert!("tallest".parse::<PeakKind>().is_err());
    }

    #[test]
    fn command_line_values_match_identifiers() {
        use clap::ValueEnum;

        assert_eq!(
            <GwComponent as ValueEnum>::from_str("hxpol", false).unwrap(),
            GwComponent::CrossPole
        );
        assert_eq!(
            <Detector as ValueEnum>::from_str("ET", false).unwrap(),
            Detector::EinsteinTelescope
        );
        assert!(<PeakKind as ValueEnum>::from_str("tallest", false).is_err());
        let names: Vec<String> = Flavour::value_variants()
            .iter()
            .filter_map(|f| f.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, ["nue", "nua", "nux", "all"]);
    }

    #[test]
    fn all_flavours_in_fixed_order() {
        assert_eq!(Flavour::All.expand(), &[Flavour::Nue, Flavour::Nua, Flavour::Nux]);
        assert_eq!(Flavour::Nua.expand(), &[Flavour::Nua]);
    }
}
