use super::*;

fn frac(s: &str) -> Fraction {
    s.parse().unwrap()
}

#[test]
fn gcd_matches_known_values() {
    assert_eq!(gcd(48, 18), 6);
    assert_eq!(gcd(100, 50), 50);
    assert_eq!(gcd(17, 19), 1);
}

#[test]
fn reduce_yields_coprime_terms_with_exact_value() {
    for n in -60i64..=60 {
        for d in (-24i64..=24).filter(|d| *d != 0) {
            let f = Fraction::reduce(n, d).unwrap();
            assert!(f.denom() > 0);
            assert_eq!(gcd(f.numer().unsigned_abs().into(), f.denom().unsigned_abs().into()), 1);
            // n/d == num/den  <=>  n*den == num*d
            assert_eq!(
                i128::from(n) * i128::from(f.denom()),
                i128::from(f.numer()) * i128::from(d)
            );
        }
    }
}

#[test]
fn reduce_rejects_zero_denominator() {
    assert!(matches!(
        Fraction::reduce(1, 0),
        Err(CutError::InvalidInput(_))
    ));
}

#[test]
fn display_uses_canonical_forms() {
    assert_eq!(Fraction::ZERO.to_string(), "0s");
    assert_eq!(Fraction::reduce(0, 25).unwrap().to_string(), "0s");
    assert_eq!(Fraction::reduce(8, 2).unwrap().to_string(), "4s");
    assert_eq!(Fraction::reduce(2002, 48000).unwrap().to_string(), "1001/24000s");
}

#[test]
fn parse_accepts_fraction_and_whole_seconds() {
    assert_eq!(frac("1001/24000s"), Fraction::reduce(1001, 24000).unwrap());
    assert_eq!(frac("48000/24000s"), Fraction::from_int(2));
    assert_eq!(frac("4s"), Fraction::from_int(4));
    assert_eq!(frac("0s"), Fraction::ZERO);
}

#[test]
fn parse_rejects_malformed_strings() {
    for bad in ["", "s", "1/2", "abc", "1/0s", "-1/2s", "1.5s", "1//2s", "/2s"] {
        assert!(
            matches!(bad.parse::<Fraction>(), Err(CutError::InvalidInput(_))),
            "expected '{bad}' to be rejected"
        );
    }
}

#[test]
fn add_matches_exact_rational_sum() {
    assert_eq!(frac("1/2s").add(frac("1/3s")), frac("5/6s"));
    assert_eq!(
        frac("260260/24000s").add(frac("1369368/24000s")),
        frac("407407/6000s")
    );
    assert_eq!(Fraction::ZERO.add(frac("7/5s")), frac("7/5s"));

    for a in 1i64..20 {
        for b in 1i64..20 {
            let x = Fraction::reduce(a, b).unwrap();
            let y = Fraction::reduce(b, a + 7).unwrap();
            let sum = x.add(y);
            // a/b + b/(a+7) == (a*(a+7) + b*b) / (b*(a+7))
            let expected = Fraction::reduce(a * (a + 7) + b * b, b * (a + 7)).unwrap();
            assert_eq!(sum, expected);
            assert_eq!(sum.to_string().parse::<Fraction>().unwrap(), expected);
        }
    }
}

#[test]
fn subtract_is_exact_and_never_negative() {
    assert_eq!(frac("5/6s").subtract(frac("1/3s")), frac("1/2s"));
    assert_eq!(frac("1/3s").subtract(frac("5/6s")), Fraction::ZERO);
    assert_eq!(frac("3s").subtract(frac("3s")), Fraction::ZERO);
    assert_eq!(frac("3s").subtract(Fraction::ZERO), frac("3s"));

    for a in 1i64..25 {
        for b in 1i64..25 {
            let x = Fraction::reduce(a, 12).unwrap();
            let y = Fraction::reduce(b, 10).unwrap();
            let diff = x.subtract(y);
            let exact = Fraction::reduce(a * 10 - b * 12, 120).unwrap();
            if exact.is_positive() {
                assert_eq!(diff, exact);
            } else {
                assert!(diff.is_zero());
            }
        }
    }
}

#[test]
fn frame_count_rounds_ties_away_from_zero() {
    let fd = frac("1/25s");
    assert_eq!(frac("4s").to_frame_count(fd), 100);
    // 0.5 frame rounds up, 0.49 frame rounds down
    assert_eq!(frac("1/50s").to_frame_count(fd), 1);
    assert_eq!(Fraction::reduce(49, 5000).unwrap().to_frame_count(fd), 0);
    assert_eq!(Fraction::reduce(-1, 50).unwrap().to_frame_count(fd), -1);
    assert_eq!(frac("1s").to_frame_count(Fraction::ZERO), 0);
}

#[test]
fn round_to_frame_boundary_snaps_and_is_idempotent() {
    let ntsc = frac("1001/24000s");
    // 2s at 23.976 is 47.952 frames, rounds to 48 frames
    assert_eq!(frac("2s").round_to_frame_boundary(ntsc), frac("1001/500s"));

    for n in 0i64..400 {
        let value = Fraction::reduce(n * 37, 1000).unwrap();
        for fd in [ntsc, frac("1/25s"), frac("1001/30000s"), frac("1/50s")] {
            let once = value.round_to_frame_boundary(fd);
            assert_eq!(once.round_to_frame_boundary(fd), once);
        }
    }
}

#[test]
fn from_seconds_uses_fixed_scale() {
    assert_eq!(Fraction::from_seconds(0.0).unwrap(), Fraction::ZERO);
    assert_eq!(Fraction::from_seconds(1.0).unwrap(), frac("1s"));
    assert_eq!(Fraction::from_seconds(6.044042).unwrap(), frac("1511/250s"));
    assert_eq!(Fraction::from_seconds(0.33333).unwrap(), frac("3333/10000s"));
    assert!(Fraction::from_seconds(f64::NAN).is_err());
    assert!(Fraction::from_seconds(f64::INFINITY).is_err());
}

#[test]
fn ordering_and_sum() {
    assert!(frac("1/3s") < frac("1/2s"));
    assert!(frac("2s") > frac("1001/1000s"));
    let total: Fraction = [frac("1/2s"), frac("1/3s"), frac("1/6s")].into_iter().sum();
    assert_eq!(total, Fraction::ONE);
}

#[test]
fn serde_uses_string_form() {
    let json = serde_json::to_string(&frac("1001/24000s")).unwrap();
    assert_eq!(json, "\"1001/24000s\"");
    let back: Fraction = serde_json::from_str("\"48000/24000s\"").unwrap();
    assert_eq!(back, frac("2s"));
    assert!(serde_json::from_str::<Fraction>("\"two seconds\"").is_err());
}
