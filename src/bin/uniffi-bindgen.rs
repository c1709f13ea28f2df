// Generates Kotlin bindings for the Android app from the compiled library.
fn main() {
    uniffi::uniffi_bindgen_main()
}
