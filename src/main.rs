fn main() {
    ip_indicator_lib::run()
}
