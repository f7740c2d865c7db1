fn main() {
    println!("cargo:rerun-if-changed=config/default.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
