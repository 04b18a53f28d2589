use super::Scroll;

#[test]
fn it_follows_the_newest_line() {
    let mut scroll = Scroll::default();
    scroll.set_state(5, 10);
    assert_eq!(scroll.position, 0);

    scroll.set_state(25, 10);
    assert_eq!(scroll.position, 15);
    assert!(scroll.is_following());
}

#[test]
fn it_stops_following_when_scrolled_up() {
    let mut scroll = Scroll::default();
    scroll.set_state(25, 10);

    scroll.up();
    assert_eq!(scroll.position, 14);
    assert!(!scroll.is_following());

    scroll.set_state(30, 10);
    assert_eq!(scroll.position, 14);
}

#[test]
fn it_resumes_following_at_the_bottom() {
    let mut scroll = Scroll::default();
    scroll.set_state(25, 10);
    scroll.up_page();
    assert_eq!(scroll.position, 5);

    scroll.down_page();
    assert_eq!(scroll.position, 15);
    assert!(scroll.is_following());

    scroll.set_state(26, 10);
    assert_eq!(scroll.position, 16);
}

#[test]
fn it_clamps_to_the_content() {
    let mut scroll = Scroll::default();
    scroll.set_state(12, 10);

    scroll.down();
    scroll.down();
    scroll.down();
    assert_eq!(scroll.position, 2);

    scroll.up_page();
    scroll.up();
    assert_eq!(scroll.position, 0);
}
