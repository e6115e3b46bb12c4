use super::*;

const SAMPLE_MTL: &str = "\
newmtl white
Ns 250.0
Ka 1.0 1.0 1.0
Kd 0.8 0.8 0.8
Ks 0.5 0.5 0.5
Ke 0.0 0.0 0.0
Ni 1.45
d 1.0
illum 2
newmtl glass
Kd 0.2 0.3 0.9
d 0.35
";

#[test]
fn test_parse_reads_all_directives() {
    let set = MaterialSet::parse(SAMPLE_MTL).unwrap();
    assert_eq!(set.len(), 2);

    let white = set.get("white").unwrap();
    assert_eq!(white.name, "white");
    assert_eq!(white.specular_exponent, 250.0);
    assert_eq!(white.ambient_color, Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(white.diffuse_color, Vec3::new(0.8, 0.8, 0.8));
    assert_eq!(white.specular_color, Vec3::new(0.5, 0.5, 0.5));
    assert_eq!(white.emissive_color, Vec3::ZERO);
    assert_eq!(white.refraction_index, 1.45);
    assert_eq!(white.dissolve, 1.0);
    assert_eq!(white.illumination_model, 2);
    assert!(white.diffuse_map.is_none());
}

#[test]
fn test_parse_defaults_for_unset_fields() {
    let glass = MaterialSet::parse(SAMPLE_MTL).unwrap();
    let glass = glass.get("glass").unwrap();

    assert_eq!(glass.diffuse_color, Vec3::new(0.2, 0.3, 0.9));
    assert_eq!(glass.dissolve, 0.35);
    // Untouched fields keep their defaults
    assert_eq!(glass.specular_exponent, 0.0);
    assert_eq!(glass.refraction_index, 1.0);
    assert_eq!(glass.illumination_model, 0);
}

#[test]
fn test_unknown_directives_are_ignored() {
    let source = "newmtl m\nmap_Kd texture.png\nKd 0.5 0.5 0.5\nTf 1 1 1\n";
    let set = MaterialSet::parse(source).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("m").unwrap().diffuse_color, Vec3::new(0.5, 0.5, 0.5));
}

#[test]
fn test_directive_before_newmtl_is_rejected() {
    let result = MaterialSet::parse("Kd 1 0 0\nnewmtl late\n");
    assert!(matches!(
        result,
        Err(crate::error::Error::ParseUnexpectedToken { line: 1, .. })
    ));
}

#[test]
fn test_malformed_number_is_rejected() {
    let result = MaterialSet::parse("newmtl m\nNs abc\n");
    assert!(matches!(
        result,
        Err(crate::error::Error::ParseUnexpectedToken { line: 2, .. })
    ));
}

#[test]
fn test_lookup_by_unknown_name_is_none() {
    let set = MaterialSet::parse(SAMPLE_MTL).unwrap();
    assert!(set.get("chrome").is_none());
}

#[test]
fn test_empty_source_yields_empty_set() {
    let set = MaterialSet::parse("").unwrap();
    assert!(set.is_empty());
}
