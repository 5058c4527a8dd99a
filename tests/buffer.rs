mod common;

mod tests {
    use flower_light_engine::{BufferError, LedBuffer, Rgb};

    use super::common::{BLACK, BLUE, GREEN, RED, RecordingDriver, WHITE};

    #[test]
    fn test_new_buffer_is_black() {
        let leds: LedBuffer<8> = LedBuffer::new(5, 1.0).unwrap();
        assert_eq!(leds.len(), 5);
        assert_eq!(leds.capacity(), 8);
        assert!(leds.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_new_buffer_over_capacity() {
        let leds = LedBuffer::<4>::new(5, 1.0);
        assert_eq!(
            leds.err(),
            Some(BufferError::CapacityExceeded {
                requested: 5,
                capacity: 4
            })
        );
    }

    #[test]
    fn test_set_get_round_trip_at_full_brightness() {
        let mut leds: LedBuffer<8> = LedBuffer::new(4, 1.0).unwrap();
        let color = Rgb { r: 12, g: 200, b: 99 };
        leds.set(2, color).unwrap();
        assert_eq!(leds.get(2), Ok(color));
        assert_eq!(leds.frame()[2], color);
    }

    #[test]
    fn test_set_scales_hardware_frame() {
        let mut leds: LedBuffer<8> = LedBuffer::new(2, 0.5).unwrap();
        leds.set(0, Rgb { r: 200, g: 101, b: 1 }).unwrap();
        assert_eq!(leds.frame()[0], Rgb { r: 100, g: 50, b: 0 });
        assert_eq!(leds.get(0), Ok(Rgb { r: 200, g: 101, b: 1 }));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut leds: LedBuffer<8> = LedBuffer::new(3, 1.0).unwrap();
        assert_eq!(
            leds.get(3),
            Err(BufferError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            leds.set(7, RED),
            Err(BufferError::IndexOutOfBounds { index: 7, len: 3 })
        );
    }

    #[test]
    fn test_set_brightness_is_idempotent() {
        let mut leds: LedBuffer<8> = LedBuffer::new(3, 1.0).unwrap();
        leds.set(0, Rgb { r: 201, g: 99, b: 37 }).unwrap();
        leds.set(1, WHITE).unwrap();

        leds.set_brightness(0.37);
        let once: Vec<Rgb> = leds.frame().to_vec();
        leds.set_brightness(0.37);
        assert_eq!(leds.frame(), once.as_slice());
    }

    #[test]
    fn test_brightness_zero_is_reversible() {
        let mut leds: LedBuffer<8> = LedBuffer::new(2, 1.0).unwrap();
        leds.fill(GREEN);
        leds.set_brightness(0.0);
        assert!(leds.frame().iter().all(|&p| p == BLACK));

        leds.set_brightness(1.0);
        assert!(leds.frame().iter().all(|&p| p == GREEN));
    }

    #[test]
    fn test_set_brightness_clamps() {
        let mut leds: LedBuffer<8> = LedBuffer::new(1, 1.0).unwrap();
        leds.fill(WHITE);

        leds.set_brightness(1.5);
        assert_eq!(leds.brightness(), 1.0);
        assert_eq!(leds.frame()[0], WHITE);

        leds.set_brightness(-0.2);
        assert_eq!(leds.brightness(), 0.0);
        assert_eq!(leds.frame()[0], BLACK);

        leds.set_brightness(f32::NAN);
        assert_eq!(leds.brightness(), 0.0);
    }

    #[test]
    fn test_init_keeps_brightness() {
        let mut leds: LedBuffer<8> = LedBuffer::new(2, 0.25).unwrap();
        leds.fill(RED);
        leds.init(6).unwrap();
        assert_eq!(leds.len(), 6);
        assert_eq!(leds.brightness(), 0.25);
        assert!(leds.pixels().iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_reinit_from_pixels() {
        let mut leds: LedBuffer<8> = LedBuffer::new(2, 0.5).unwrap();
        leds.reinit_from(&[RED, BLUE, WHITE]).unwrap();
        assert_eq!(leds.pixels(), &[RED, BLUE, WHITE]);
        assert_eq!(leds.frame()[0], Rgb { r: 127, g: 0, b: 0 });

        assert_eq!(
            leds.reinit_from(&[RED; 9]),
            Err(BufferError::CapacityExceeded {
                requested: 9,
                capacity: 8
            })
        );
        assert_eq!(leds.len(), 3);
    }

    #[test]
    fn test_rotate_left_and_right() {
        let mut leds: LedBuffer<8> = LedBuffer::new(0, 1.0).unwrap();
        leds.reinit_from(&[RED, GREEN, BLUE, WHITE]).unwrap();

        leds.rotate_left(0..4).unwrap();
        assert_eq!(leds.pixels(), &[GREEN, BLUE, WHITE, RED]);

        leds.rotate_right(1..4).unwrap();
        assert_eq!(leds.pixels(), &[GREEN, RED, BLUE, WHITE]);

        assert!(leds.rotate_left(2..5).is_err());
        assert_eq!(leds.pixels(), &[GREEN, RED, BLUE, WHITE]);
    }

    #[test]
    fn test_flush_writes_hardware_frame() {
        let mut leds: LedBuffer<8> = LedBuffer::new(2, 0.5).unwrap();
        leds.fill(WHITE);

        let mut driver = RecordingDriver::default();
        leds.flush(&mut driver);
        assert_eq!(driver.frames.len(), 1);
        assert_eq!(
            driver.last(),
            Some(&[Rgb { r: 127, g: 127, b: 127 }; 2][..])
        );
    }
}
