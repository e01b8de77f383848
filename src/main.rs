use trumetrapla::ColumnMappingError;

fn main() {
    if let Err(err) = trumetrapla::run() {
        eprintln!("error: {err:#}");
        if err.downcast_ref::<ColumnMappingError>().is_some() {
            eprintln!(
                "hint: run `trumetrapla suggest` on the same file to see the detected columns, \
                 then pin them with --column FIELD=COLUMN"
            );
        }
        std::process::exit(1);
    }
}
