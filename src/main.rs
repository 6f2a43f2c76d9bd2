use std::io;

fn main() -> io::Result<()> {
    let mut args = std::env::args();
    args.next();

    if let (Some(comm), Some(root_str)) = (args.next(), args.next()) {
        let seed = args.next().and_then(|s| s.parse().ok());
        vaxeff::runner(&comm, &root_str, seed)?;
    } else {
        println!("{}", vaxeff::USAGE);
    }
    Ok(())
}
