mod tests {
    use flower_light_engine::ColorEffect;
    use flower_light_engine::color::{ColorError, Rgb, hsv_to_rgb, lerp_colors, parse_hex_color};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Ok(RED));
        assert_eq!(parse_hex_color("#0000FF"), Ok(BLUE));
        assert_eq!(
            parse_hex_color(" #12ab9C "),
            Ok(Rgb {
                r: 0x12,
                g: 0xab,
                b: 0x9c
            })
        );
        assert_eq!(parse_hex_color("ffffff"), Ok(WHITE));
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert_eq!(parse_hex_color("#fff"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color("#gg0000"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color("#ff00001"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color("#ffé00"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color(""), Err(ColorError::InvalidHex));
    }

    #[test]
    fn test_hsv_pure_hues() {
        let expected = [
            (255, 0, 0),
            (255, 255, 0),
            (0, 255, 0),
            (0, 255, 255),
            (0, 0, 255),
            (255, 0, 255),
        ];
        for (sector, (r, g, b)) in expected.into_iter().enumerate() {
            let hue = sector as f32 / 6.0;
            assert_eq!(hsv_to_rgb(hue, 1.0, 1.0), Rgb { r, g, b }, "hue {}", hue);
        }
    }

    #[test]
    fn test_hsv_wraps_and_desaturates() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), RED);
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.5), Rgb { r: 127, g: 127, b: 127 });
        assert_eq!(hsv_to_rgb(0.5, 1.0, 0.0), BLACK);
    }

    #[test]
    fn test_lerp_colors() {
        assert_eq!(lerp_colors(BLACK, WHITE, 0.0), BLACK);
        assert_eq!(lerp_colors(BLACK, WHITE, 1.0), WHITE);
        assert_eq!(lerp_colors(BLACK, WHITE, 0.5), Rgb { r: 127, g: 127, b: 127 });
        assert_eq!(lerp_colors(RED, BLUE, 0.5), Rgb { r: 127, g: 0, b: 127 });
    }

    #[test]
    fn test_color_effect_parse() {
        assert_eq!(ColorEffect::parse_from_str("#ff0000"), Ok(ColorEffect::Solid(RED)));
        assert_eq!(ColorEffect::parse_from_str("rainbow"), Ok(ColorEffect::Rainbow));
        assert_eq!(ColorEffect::parse_from_str("rainbow2"), Ok(ColorEffect::Rainbow2));
        assert_eq!(
            ColorEffect::parse_from_str("grad,#000000,#ffffff"),
            Ok(ColorEffect::Gradient(BLACK, WHITE))
        );
        assert_eq!(
            ColorEffect::parse_from_str("gradient,#ff0000, #0000ff"),
            Ok(ColorEffect::Gradient(RED, BLUE))
        );
    }

    #[test]
    fn test_color_effect_parse_errors() {
        assert_eq!(ColorEffect::parse_from_str("purple"), Err(ColorError::UnknownColor));
        assert_eq!(
            ColorEffect::parse_from_str("grad,#000000"),
            Err(ColorError::UnknownColor)
        );
        assert_eq!(
            ColorEffect::parse_from_str("grad,#000000,#ffffff,#ff0000"),
            Err(ColorError::UnknownColor)
        );
        assert_eq!(
            ColorEffect::parse_from_str("stripes,#000000,#ffffff"),
            Err(ColorError::UnknownColor)
        );
        assert_eq!(ColorEffect::parse_from_str("#12345"), Err(ColorError::InvalidHex));
        assert_eq!(
            ColorEffect::parse_from_str("grad,#000000,#zzzzzz"),
            Err(ColorError::InvalidHex)
        );
    }

    #[test]
    fn test_color_effect_display_is_canonical() {
        assert_eq!(ColorEffect::Solid(RED).to_string(), "#ff0000");
        assert_eq!(
            ColorEffect::Gradient(BLACK, WHITE).to_string(),
            "grad,#000000,#ffffff"
        );
        assert_eq!(ColorEffect::Rainbow2.to_string(), "rainbow2");

        let parsed = ColorEffect::parse_from_str("gradient,#FF0000,#0000FF");
        assert_eq!(parsed.map(|c| c.to_string()), Ok("grad,#ff0000,#0000ff".to_string()));
    }
}
