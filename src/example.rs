fn main() {
    let mut buf = [0_u8; 128];
    let len = rasfmt::sprintf!(&mut buf, "sprintf(%5s|%05d|%x)", "hi", -42, 255);
    println!("{}", String::from_utf8_lossy(&buf[..len]));

    let b = &mut [0_u8; 100];
    rasfmt::sprintf!(b, "%f %.2f %e %E", 3.5, 100.75, 2500.0, 0.25);
    println!("{}", String::from_utf8_lossy(rasfmt::as_text(b)));

    let args = [rasfmt::Arg::from("ab"), rasfmt::Arg::from(1)];
    match rasfmt::format(&mut buf, b"%s %f", &args) {
        Ok(len) => println!("{}", String::from_utf8_lossy(&buf[..len])),
        Err(e) => println!("format error: {} after {:?}", e, String::from_utf8_lossy(rasfmt::as_text(&buf))),
    }

    println!(
        "len = {} cmp = {:?}",
        rasfmt::bounded_length(b"abcdef", 3),
        rasfmt::compare(b"abc", b"abd")
    );
}
