//! Synthesized rain, used when no ambient track is supplied.

/// Glicol composition: band-passed noise bed with a slow sweep, plus sparse
/// noise-burst droplets, through a short plate reverb.
pub const RAIN_COMPOSITION: &str = r#"
~sweep: sin 0.07 >> mul 400 >> add 1400
~hiss: noise 42 >> lpf ~sweep 1.0 >> hpf 300.0 1.0 >> mul 0.18
~grain: noise 7 >> mul 0.3
~drops: imp 7 >> envperc 0.001 0.03 >> mul ~grain
o: ~hiss >> add ~drops >> plate 0.15
"#;
